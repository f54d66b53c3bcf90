mod ui;

use clap::Parser;
use gtk4::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "word-lookup")]
#[command(version)]
#[command(about = "Dictionary lookup window", long_about = None)]
struct Cli {
    /// Word to look up. Several arguments are joined with single spaces.
    /// Words may start with '-'; options must come before the first word.
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    words: Vec<String>,

    /// Verbose logging.
    #[arg(long)]
    debug: bool,
}

fn main() -> glib::ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "info,ui_gtk=debug,utils=debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .try_init();

    let cfg = utils::config::resolve_config();
    let word = cli.words.join(" ");
    let word = if word.trim().is_empty() { None } else { Some(word) };

    // A window may already be up: hand the word over and leave before touching GTK.
    if let Some(w) = word.as_deref() {
        match utils::client::send_word(cfg.endpoint(), w, cfg.connect_timeout()) {
            Ok(()) => {
                log::info!("forwarded {:?} to running instance", w);
                return glib::ExitCode::SUCCESS;
            }
            Err(e) => log::debug!("no running instance: {e:#}"),
        }
    }

    // GTK apps must run on the main thread.
    // Uniqueness comes from the coordination endpoint, not from D-Bus.
    let app = gtk4::Application::builder()
        .application_id("io.github.wordlookup.ui-gtk")
        .flags(gtk4::gio::ApplicationFlags::NON_UNIQUE)
        .build();

    app.connect_startup(ui::install_accels);

    let startup = ui::Startup { cfg, word };
    app.connect_activate(move |app| {
        ui::build_ui(app, &startup);
    });

    // Our own arguments were parsed by clap already.
    app.run_with_args::<&str>(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphenated_word_is_a_word() {
        let cli = Cli::try_parse_from(["word-lookup", "-ing"]).unwrap();
        assert_eq!(cli.words, vec!["-ing"]);

        let cli = Cli::try_parse_from(["word-lookup", "--debug", "-ism", "suffix"]).unwrap();
        assert!(cli.debug);
        assert_eq!(cli.words.join(" "), "-ism suffix");
    }
}

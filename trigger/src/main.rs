use clap::Parser;

use trigger::deliver::{send_or_spawn, DeliveryOpts, Outcome};
use trigger::procs::{resolve_app_binary, spawn_detached};

#[derive(Parser)]
#[command(name = "word-lookup-trigger")]
#[command(version)]
#[command(about = "Send a word to the running word-lookup window, starting it if needed")]
struct Cli {
    /// Word to look up. Several arguments are joined with single spaces.
    /// Words may start with '-'; options must come before the first word.
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    words: Vec<String>,

    /// Coordination endpoint (loopback only), overrides config and WORD_LOOKUP_ADDR.
    #[arg(long)]
    addr: Option<String>,

    /// Verbose logging.
    #[arg(long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Quiet by default: this runs from hotkeys where nobody reads stderr.
    let default_filter = if cli.debug { "warn,trigger=debug,utils=debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .try_init();

    let mut cfg = utils::config::resolve_config();
    if let Some(addr) = cli.addr {
        cfg.addr = addr;
    }
    let opts = DeliveryOpts::from_config(&cfg);

    let word = cli.words.join(" ");
    let word = if word.trim().is_empty() { None } else { Some(word) };

    let outcome = send_or_spawn(&opts, word.as_deref(), || {
        let bin = resolve_app_binary(cfg.app_path.as_deref());
        spawn_detached(&bin)
    })
    .await;
    log::debug!("outcome: {:?}", outcome);

    // Every outcome exits 0; failures were already logged.
    if outcome == Outcome::SpawnFailed {
        eprintln!("word-lookup could not be started; set {} to its path", trigger::procs::APP_PATH_ENV);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphenated_word_is_a_word() {
        let cli = Cli::try_parse_from(["word-lookup-trigger", "-ing"]).unwrap();
        assert_eq!(cli.words, vec!["-ing"]);
        assert!(!cli.debug);

        let cli = Cli::try_parse_from(["word-lookup-trigger", "--ism"]).unwrap();
        assert_eq!(cli.words, vec!["--ism"]);
    }

    #[test]
    fn options_before_words_still_parse() {
        let cli = Cli::try_parse_from([
            "word-lookup-trigger",
            "--debug",
            "--addr",
            "127.0.0.1:6060",
            "data",
            "-race",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.addr.as_deref(), Some("127.0.0.1:6060"));
        assert_eq!(cli.words.join(" "), "data -race");
    }
}

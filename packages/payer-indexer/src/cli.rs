pub(crate) use crate::commands::run;
use clap::{Parser, Subcommand};
use payer_indexer_lib::config::IndexerArgs;

#[derive(Parser, Debug)]
#[clap(
    name = "payer-indexer",
    about = "Payer contract debt indexer",
    version,
    rename_all = "kebab-case"
)]
pub struct Opt {
    #[clap(subcommand)]
    command: Indexer,
}

#[derive(Debug, Subcommand)]
pub enum Indexer {
    Run(IndexerArgs),
}

pub async fn run_cli() -> anyhow::Result<()> {
    let opt = Opt::try_parse();

    match opt {
        Ok(opt) => match opt.command {
            Indexer::Run(args) => run::exec(args).await,
        },
        Err(e) => {
            // Prints the error and exits.
            e.exit()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_subcommand_parses_indexer_args() {
        let opt = Opt::try_parse_from([
            "payer-indexer",
            "run",
            "--manifest",
            "payer.manifest.yaml",
            "--events",
            "logs.json",
            "--verbose",
        ])
        .unwrap();

        let Indexer::Run(args) = opt.command;
        assert_eq!(args.manifest.to_str(), Some("payer.manifest.yaml"));
        assert_eq!(args.events.to_str(), Some("logs.json"));
        assert!(args.verbose);
        assert_eq!(args.database_path, None);
    }

    #[test]
    fn test_run_subcommand_requires_events() {
        let res = Opt::try_parse_from([
            "payer-indexer",
            "run",
            "--manifest",
            "payer.manifest.yaml",
        ]);

        assert!(res.is_err());
    }
}

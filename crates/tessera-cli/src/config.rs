use std::time::{Duration, SystemTime};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tessera::{CUSTOM_EPOCH, Layout, StructuredId, TWITTER_EPOCH};

/// Command-line arguments for the `tessera` binary.
///
/// The global options select the layout and epoch and may also come from the
/// environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tessera",
    version,
    about = "Generate, pack and decode structured 64-bit identifiers"
)]
pub struct CliArgs {
    /// Bit layout of the ids: twitter, regional, wide_machine or
    /// dual_precision.
    ///
    /// Environment variable: `TESSERA_LAYOUT`
    #[arg(long, global = true, env = "TESSERA_LAYOUT", default_value_t = String::from("regional"))]
    pub layout: String,

    /// Epoch of the timestamp field, in milliseconds since 1970-01-01 UTC.
    ///
    /// Defaults to the Twitter epoch for the `twitter` layout and to
    /// 2017-01-01 for every other layout.
    ///
    /// Environment variable: `TESSERA_EPOCH_MS`
    #[arg(long, global = true, env = "TESSERA_EPOCH_MS")]
    pub epoch_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate new ids, one per line.
    Generate {
        /// Number of ids to generate.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Sequence strategy.
        #[arg(long, value_enum, default_value_t = Strategy::Monotonic)]
        strategy: Strategy,

        /// Fix a field, e.g. `--set region=3`. Repeatable.
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,

        /// Use this instant as the timestamp instead of now (free strategy
        /// only).
        #[arg(long, value_name = "RFC3339")]
        at: Option<String>,
    },

    /// Decode an id into its fields.
    Decode {
        /// The id, in decimal.
        #[arg(allow_hyphen_values = true)]
        id: String,

        #[arg(long, value_enum, default_value_t = Output::Json)]
        output: Output,
    },

    /// Pack explicit field values into an id.
    Pack {
        /// Field value, e.g. `--set timestamp=8743199851`. Every field of the
        /// layout is required.
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Current time plus a shared atomic counter; never blocks.
    Free,
    /// Strictly increasing ids under a lock.
    Monotonic,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Output {
    Json,
    Table,
}

/// Validated configuration, ready to run.
#[derive(Debug, Clone)]
pub struct Config {
    pub layout_name: String,
    pub layout: Layout,
    pub epoch: Duration,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Generate {
        count: usize,
        strategy: Strategy,
        fields: Vec<(String, u64)>,
        at: Option<SystemTime>,
    },
    Decode {
        id: StructuredId,
        output: Output,
    },
    Pack {
        fields: Vec<(String, u64)>,
    },
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let Some(layout) = Layout::by_name(&args.layout) else {
            bail!(
                "unknown layout '{}' (expected one of: {})",
                args.layout,
                Layout::NAMES.join(", ")
            );
        };

        let epoch = match args.epoch_ms {
            Some(ms) => Duration::from_millis(ms),
            None if args.layout == "twitter" => TWITTER_EPOCH,
            None => CUSTOM_EPOCH,
        };

        let action = match args.command {
            Command::Generate {
                count,
                strategy,
                set,
                at,
            } => {
                if count == 0 {
                    bail!("--count must be greater than 0");
                }
                if at.is_some() && strategy == Strategy::Monotonic {
                    bail!("--at is only supported with --strategy free");
                }
                let at = at.map(|s| parse_instant(&s)).transpose()?;
                Action::Generate {
                    count,
                    strategy,
                    fields: parse_assignments(&layout, &set)?,
                    at,
                }
            }
            Command::Decode { id, output } => Action::Decode {
                id: StructuredId::parse(&id).with_context(|| format!("cannot decode '{id}'"))?,
                output,
            },
            Command::Pack { set } => Action::Pack {
                fields: parse_assignments(&layout, &set)?,
            },
        };

        Ok(Self {
            layout_name: args.layout,
            layout,
            epoch,
            action,
        })
    }
}

fn parse_assignments(layout: &Layout, set: &[String]) -> anyhow::Result<Vec<(String, u64)>> {
    set.iter()
        .map(|pair| {
            let Some((name, value)) = pair.split_once('=') else {
                bail!("expected FIELD=VALUE, got '{pair}'");
            };
            if layout.field(name).is_none() {
                bail!("the layout has no field named '{name}'");
            }
            let value = value
                .parse::<u64>()
                .with_context(|| format!("invalid value for '{name}': '{value}'"))?;
            Ok((name.to_owned(), value))
        })
        .collect()
}

fn parse_instant(s: &str) -> anyhow::Result<SystemTime> {
    let at = chrono::DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("invalid RFC 3339 timestamp '{s}'"))?;
    Ok(SystemTime::from(at))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Config> {
        let args = CliArgs::try_parse_from(args)?;
        Config::try_from(args)
    }

    #[test]
    fn generate_defaults() {
        let config = parse(&["tessera", "--layout", "regional", "generate"]).unwrap();
        assert_eq!(config.layout, Layout::regional());
        assert_eq!(
            config.action,
            Action::Generate {
                count: 1,
                strategy: Strategy::Monotonic,
                fields: vec![],
                at: None,
            }
        );
    }

    #[test]
    fn twitter_uses_twitter_epoch_unless_overridden() {
        let config = parse(&["tessera", "--layout", "twitter", "generate"]).unwrap();
        assert_eq!(config.epoch, TWITTER_EPOCH);

        let config = parse(&[
            "tessera",
            "--layout",
            "twitter",
            "--epoch-ms",
            "1000",
            "generate",
        ])
        .unwrap();
        assert_eq!(config.epoch, Duration::from_millis(1000));
    }

    #[test]
    fn assignments_are_parsed_and_checked() {
        let config = parse(&[
            "tessera",
            "--layout",
            "regional",
            "generate",
            "--set",
            "region=3",
            "--set",
            "machine=17",
        ])
        .unwrap();
        let Action::Generate { fields, .. } = config.action else {
            panic!("expected generate");
        };
        assert_eq!(
            fields,
            vec![("region".to_owned(), 3), ("machine".to_owned(), 17)]
        );

        for bad in ["region", "region=x", "worker=1", "region=-1"] {
            let result = parse(&[
                "tessera", "--layout", "regional", "generate", "--set", bad,
            ]);
            assert!(result.is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn rejects_bad_options() {
        assert!(parse(&["tessera", "--layout", "peony", "generate"]).is_err());
        assert!(parse(&["tessera", "--layout", "regional", "generate", "-n", "0"]).is_err());
        assert!(
            parse(&[
                "tessera",
                "--layout",
                "regional",
                "generate",
                "--at",
                "2020-01-01T00:00:00Z",
            ])
            .is_err()
        );
        assert!(parse(&["tessera", "--layout", "regional", "decode", "+12"]).is_err());
    }

    #[test]
    fn decode_accepts_negative_ids() {
        let config = parse(&[
            "tessera",
            "--layout",
            "regional",
            "decode",
            "-9186966433981537281",
            "--output",
            "table",
        ])
        .unwrap();
        assert_eq!(
            config.action,
            Action::Decode {
                id: StructuredId::from_raw(-9_186_966_433_981_537_281),
                output: Output::Table,
            }
        );
    }

    #[test]
    fn at_is_parsed_as_rfc3339() {
        let config = parse(&[
            "tessera",
            "--layout",
            "regional",
            "generate",
            "--strategy",
            "free",
            "--at",
            "2017-01-01T00:00:01.500+00:00",
        ])
        .unwrap();
        let Action::Generate { at, .. } = config.action else {
            panic!("expected generate");
        };
        assert_eq!(
            at,
            Some(SystemTime::UNIX_EPOCH + CUSTOM_EPOCH + Duration::from_millis(1_500))
        );
    }
}

use std::io::Write;

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tessera::{
    EpochClock, FieldValues, FreeRunningGenerator, MonotonicGenerator, Overrides, StructuredId,
    TIMESTAMP,
};

use crate::config::{Action, Config, Output, Strategy};

/// JSON rendering of a decoded id.
#[derive(Serialize)]
struct DecodedId<'a> {
    #[serde(with = "tessera::as_decimal")]
    id: StructuredId,
    layout: &'a str,
    #[serde(flatten)]
    fields: FieldValues,
    created_at: Option<String>,
}

/// Runs the configured action, writing its output to `out`.
pub fn run(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    let clock = EpochClock::new(config.epoch);

    match &config.action {
        Action::Generate {
            count,
            strategy,
            fields,
            at,
        } => generate(config, clock, *count, *strategy, fields, *at, out),
        Action::Decode { id, output } => decode(config, &clock, *id, *output, out),
        Action::Pack { fields } => {
            let values = config
                .layout
                .values_from(fields.iter().map(|(name, value)| (name.as_str(), *value)))?;
            let id = config.layout.pack(&values).context("cannot pack fields")?;
            writeln!(out, "{id}")?;
            Ok(())
        }
    }
}

fn generate(
    config: &Config,
    clock: EpochClock,
    count: usize,
    strategy: Strategy,
    fields: &[(String, u64)],
    at: Option<std::time::SystemTime>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    tracing::debug!(count, ?strategy, layout = %config.layout_name, "generating ids");

    match strategy {
        Strategy::Monotonic => {
            let generator = fields
                .iter()
                .fold(
                    MonotonicGenerator::builder(config.layout.clone()),
                    |builder, (name, value)| builder.field(name.as_str(), *value),
                )
                .build(clock)
                .context("invalid generator configuration")?;
            for _ in 0..count {
                writeln!(out, "{}", generator.next_id()?)?;
            }
        }
        Strategy::Free => {
            let generator = FreeRunningGenerator::new(config.layout.clone(), clock);
            let mut overrides = fields
                .iter()
                .fold(Overrides::new(), |o, (name, value)| o.set(name.as_str(), *value));
            if let Some(at) = at {
                overrides = overrides.at(at);
            }
            for _ in 0..count {
                writeln!(out, "{}", generator.generate_with(&overrides)?)?;
            }
        }
    }
    Ok(())
}

fn decode(
    config: &Config,
    clock: &EpochClock,
    id: StructuredId,
    output: Output,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let fields = config.layout.unpack(id);
    let unit = config.layout.resolve_id(id).unit();
    let created_at = fields.get(TIMESTAMP).map(|ticks| {
        DateTime::<Utc>::from(clock.to_system_time(ticks, unit))
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    });

    match output {
        Output::Json => {
            let decoded = DecodedId {
                id,
                layout: &config.layout_name,
                fields,
                created_at,
            };
            serde_json::to_writer_pretty(&mut *out, &decoded)?;
            writeln!(out)?;
        }
        Output::Table => {
            writeln!(out, "{}", config.layout.describe(id))?;
            if let Some(created_at) = created_at {
                writeln!(out, "created at: {created_at}")?;
            }
        }
    }
    Ok(())
}

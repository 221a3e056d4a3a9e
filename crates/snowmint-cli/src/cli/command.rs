use anyhow::Context;
use serde::Serialize;
use snowmint::{ParsedId, SnowflakeGenerator, SnowflakeId, SystemClock, TimeSource};
use std::io::Write;

use crate::cli::config::{CliConfig, Command};

/// One decoded ID, as printed by `parse`.
#[derive(Debug, Serialize)]
struct ParseReport {
    #[serde(with = "snowmint::as_decimal_str")]
    id: SnowflakeId,
    epoch: u64,
    unix_millis: u64,
    fields: ParsedId,
}

/// Runs the configured subcommand against the system clock.
pub fn run(config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    run_with_time(config, SystemClock, out)
}

pub fn run_with_time<T: TimeSource>(
    config: &CliConfig,
    time: T,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut generator = SnowflakeGenerator::with_time(config.datacenter, config.worker, time)?;
    if let Some(epoch) = config.epoch {
        generator
            .set_epoch(epoch)
            .with_context(|| format!("invalid epoch {epoch}"))?;
    }

    match &config.command {
        Command::Mint { count } => mint(&mut generator, *count, config.json, out),
        Command::Parse { ids, bits } => parse(&generator, ids, !*bits, config.json, out),
    }
}

fn mint<T: TimeSource>(
    generator: &mut SnowflakeGenerator<T>,
    count: usize,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    tracing::info!(
        count,
        datacenter = generator.datacenter(),
        worker = generator.worker(),
        epoch = generator.epoch(),
        "minting ids"
    );

    let ids = (0..count)
        .map(|_| generator.mint())
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        serde_json::to_writer(&mut *out, &ids)?;
        writeln!(out)?;
    } else {
        for id in ids {
            writeln!(out, "{id}")?;
        }
    }
    Ok(())
}

fn parse<T: TimeSource>(
    generator: &SnowflakeGenerator<T>,
    ids: &[String],
    transform: bool,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let epoch = generator.epoch();
    let reports = ids
        .iter()
        .map(|raw| {
            let id: SnowflakeId = raw
                .trim()
                .parse()
                .with_context(|| format!("cannot parse {raw:?} as a snowflake id"))?;
            Ok(ParseReport {
                id,
                epoch,
                unix_millis: id.parts().timestamp_at(epoch),
                fields: generator.parse(id, transform),
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if json {
        serde_json::to_writer(&mut *out, &reports)?;
        writeln!(out)?;
        return Ok(());
    }

    for report in reports {
        match &report.fields {
            ParsedId::Decimal(parts) => writeln!(
                out,
                "{} timestamp={} datacenter={} worker={} sequence={} unix_millis={}",
                report.id,
                parts.timestamp,
                parts.datacenter,
                parts.worker,
                parts.sequence,
                report.unix_millis
            )?,
            ParsedId::Bits(bits) => writeln!(
                out,
                "{} timestamp={} datacenter={} worker={} sequence={} unix_millis={}",
                report.id,
                bits.timestamp,
                bits.datacenter,
                bits.worker,
                bits.sequence,
                report.unix_millis
            )?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTime {
        millis: u64,
    }

    impl TimeSource for MockTime {
        fn current_millis(&self) -> u64 {
            self.millis
        }
    }

    fn config(command: Command, json: bool) -> CliConfig {
        CliConfig {
            datacenter: 1,
            worker: 2,
            epoch: Some(1_000),
            json,
            command,
        }
    }

    fn render(config: &CliConfig) -> anyhow::Result<String> {
        let mut out = Vec::new();
        run_with_time(config, MockTime { millis: 3_000 }, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn mint_prints_one_id_per_line() {
        let text = render(&config(Command::Mint { count: 3 }, false)).unwrap();
        let ids: Vec<SnowflakeId> = text.lines().map(|line| line.parse().unwrap()).collect();
        assert_eq!(ids.len(), 3);
        for (sequence, id) in ids.iter().enumerate() {
            assert_eq!(id.timestamp(), 2_000);
            assert_eq!(id.datacenter(), 1);
            assert_eq!(id.worker(), 2);
            assert_eq!(id.sequence(), sequence as u64);
        }
    }

    #[test]
    fn mint_json_is_an_array_of_strings() {
        let text = render(&config(Command::Mint { count: 2 }, true)).unwrap();
        let ids: Vec<String> = serde_json::from_str(&text).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids[0].parse::<SnowflakeId>().unwrap() < ids[1].parse::<SnowflakeId>().unwrap());
    }

    #[test]
    fn parse_adds_epoch_back() {
        let id = SnowflakeId::from_components(2_000, 1, 2, 7);
        let command = Command::Parse {
            ids: vec![id.to_string()],
            bits: false,
        };
        let text = render(&config(command, false)).unwrap();
        assert_eq!(
            text.trim_end(),
            format!("{id} timestamp=2000 datacenter=1 worker=2 sequence=7 unix_millis=3000")
        );
    }

    #[test]
    fn parse_bits_and_json() {
        let id = SnowflakeId::from_components(2_000, 1, 2, 7);
        let command = Command::Parse {
            ids: vec![id.to_string()],
            bits: true,
        };
        let text = render(&config(command, true)).unwrap();
        let reports: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reports[0]["id"], serde_json::json!(id.to_string()));
        assert_eq!(reports[0]["unix_millis"], serde_json::json!(3_000));
        assert_eq!(reports[0]["fields"]["sequence"], serde_json::json!("000000000111"));
    }

    #[test]
    fn parse_rejects_garbage() {
        let command = Command::Parse {
            ids: vec!["12x".to_owned()],
            bits: false,
        };
        let err = render(&config(command, false)).unwrap_err();
        assert!(err.to_string().contains("12x"));
    }

    #[test]
    fn future_epoch_is_reported() {
        let mut config = config(Command::Mint { count: 1 }, false);
        config.epoch = Some(9_999);
        let err = render(&config).unwrap_err();
        assert!(err.to_string().contains("invalid epoch 9999"));
    }
}

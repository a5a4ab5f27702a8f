use log::{
    Record,
    kv::{Error, Key, Value, VisitSource},
};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::encode::{Color, Encode, Style, Write};
use serde::Deserialize;

const DEFAULT_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:5})} {t} - {m}";

#[derive(Debug, Deserialize)]
pub struct KvConsoleEncoderConfig {
    pub pattern: Option<String>,
}

/// Pattern encoder that appends the record's key-value pairs as ` key=value`.
///
/// Keys are highlighted when the appender supports styling, so a skipped
/// field reads as `... Skipped field in peer response field=nonHashData reason=missing`.
#[derive(Debug)]
pub struct KvConsoleEncoder {
    delegate: PatternEncoder,
}

impl KvConsoleEncoder {
    pub fn new(pattern: &str) -> Self {
        Self {
            delegate: PatternEncoder::new(pattern),
        }
    }
}

impl Default for KvConsoleEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

impl Encode for KvConsoleEncoder {
    fn encode(&self, w: &mut dyn Write, record: &Record) -> anyhow::Result<()> {
        self.delegate.encode(w, record)?;

        let mut pairs = PairCollector::default();
        record
            .key_values()
            .visit(&mut pairs)
            .map_err(|e| anyhow::anyhow!("KV error: {}", e))?;

        for (key, value) in pairs.0 {
            w.set_style(Style::new().text(Color::Cyan))?;
            write!(w, " {}=", key)?;
            w.set_style(&Style::default())?;
            write!(w, "{}", value)?;
        }

        w.write_all(b"\n")?;
        Ok(())
    }
}

// Rendered eagerly so that write errors surface from `encode` rather than from inside the visitor.
#[derive(Default)]
struct PairCollector(Vec<(String, String)>);

impl<'kvs> VisitSource<'kvs> for PairCollector {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), Error> {
        self.0.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

pub struct KvConsoleEncoderDeserializer;

impl log4rs::config::Deserialize for KvConsoleEncoderDeserializer {
    type Trait = dyn Encode;
    type Config = KvConsoleEncoderConfig;

    fn deserialize(
        &self,
        config: KvConsoleEncoderConfig,
        _: &log4rs::config::Deserializers,
    ) -> anyhow::Result<Box<dyn Encode>> {
        Ok(Box::new(match config.pattern.as_deref() {
            Some(pattern) => KvConsoleEncoder::new(pattern),
            None => KvConsoleEncoder::default(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use log4rs::encode::writer::simple::SimpleWriter;

    #[test]
    fn test_pairs_follow_the_message() {
        let encoder = KvConsoleEncoder::new("{l} {m}");
        let kvs = [("field", "nonHashData"), ("reason", "missing")];
        let record = Record::builder()
            .level(Level::Warn)
            .args(format_args!("Skipped field in peer response"))
            .key_values(&kvs)
            .build();

        let mut out = SimpleWriter(Vec::new());
        encoder.encode(&mut out, &record).unwrap();

        assert_eq!(
            String::from_utf8(out.0).unwrap(),
            "WARN Skipped field in peer response field=nonHashData reason=missing\n"
        );
    }
}

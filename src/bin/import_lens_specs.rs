//! Imports lens reference specs from a Lensfun XML database file.
//!
//! Usage: import_lens_specs <path/to/lenses.xml>
//!
//! Rows already present (matched on maker + model) are left alone, so the
//! import is safe to re-run after a database update.

use anyhow::{bail, Context};
use chrono::Utc;
use gear_ops_api::db::models::LensSpec;
use gear_ops_api::db::DbClient;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
struct LensEntry {
    maker: Option<String>,
    model: Option<String>,
    mount: Option<String>,
    focal_min: Option<f64>,
    focal_max: Option<f64>,
    aperture: Option<f64>,
}

impl LensEntry {
    fn into_spec(self, source: &str) -> Option<LensSpec> {
        Some(LensSpec {
            id: Uuid::new_v4(),
            maker: self.maker?,
            model: self.model?,
            mount: self.mount,
            focal_min: self.focal_min,
            focal_max: self.focal_max,
            aperture: self.aperture,
            source: source.to_string(),
            created_at: Utc::now().naive_utc(),
        })
    }
}

/// Pulls every <lens> element out of the Lensfun XML document.
fn parse_lensfun(xml: &str) -> anyhow::Result<Vec<LensEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<LensEntry> = None;
    let mut text_field: Option<&'static str> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"lens" => current = Some(LensEntry::default()),
                b"maker" => text_field = Some("maker"),
                b"model" => text_field = Some("model"),
                b"mount" => text_field = Some("mount"),
                _ => text_field = None,
            },
            Event::Empty(e) => {
                if let Some(entry) = current.as_mut() {
                    match e.name().as_ref() {
                        b"focal" => {
                            for attr in e.attributes().flatten() {
                                let value = String::from_utf8_lossy(&attr.value)
                                    .parse::<f64>()
                                    .ok();
                                match attr.key.as_ref() {
                                    b"min" => entry.focal_min = value,
                                    b"max" => entry.focal_max = value,
                                    b"value" => {
                                        entry.focal_min = value;
                                        entry.focal_max = value;
                                    }
                                    _ => {}
                                }
                            }
                        }
                        b"aperture" => {
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"min" {
                                    entry.aperture = String::from_utf8_lossy(&attr.value)
                                        .parse::<f64>()
                                        .ok();
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::Text(t) => {
                if let (Some(entry), Some(field)) = (current.as_mut(), text_field) {
                    let value = t.unescape()?.into_owned();
                    match field {
                        "maker" => entry.maker = Some(value),
                        "model" => entry.model = Some(value),
                        "mount" => entry.mount = Some(value),
                        _ => {}
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"lens" => {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                }
                _ => text_field = None,
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("Usage: import_lens_specs <path/to/lenses.xml>");
    };
    let xml = fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
    let entries = parse_lensfun(&xml)?;
    info!("Parsed {} lens entries from {}", entries.len(), path);

    let db = DbClient::from_env();
    let mut inserted = 0usize;
    let mut skipped = 0usize;
    let mut incomplete = 0usize;

    for entry in entries {
        let Some(spec) = entry.into_spec("lensfun") else {
            incomplete += 1;
            continue;
        };
        if db.insert_lens_spec_if_new(&spec).await? {
            inserted += 1;
        } else {
            skipped += 1;
        }
    }

    if incomplete > 0 {
        warn!("{} entries lacked a maker or model and were dropped", incomplete);
    }
    info!(
        "Import finished: {} inserted, {} already present",
        inserted, skipped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <lensdatabase>
            <lens>
                <maker>Canon</maker>
                <model>Canon EF 24-70mm f/2.8L USM</model>
                <mount>Canon EF</mount>
                <focal min="24" max="70"/>
                <aperture min="2.8" max="22"/>
            </lens>
            <lens>
                <maker>Nikon</maker>
                <model>Nikkor 50mm f/1.8</model>
                <mount>Nikon F</mount>
                <focal value="50"/>
                <aperture min="1.8"/>
            </lens>
            <lens>
                <model>Orphan without maker</model>
            </lens>
        </lensdatabase>
    "#;

    #[test]
    fn test_parse_lensfun_sample() {
        let entries = parse_lensfun(SAMPLE).unwrap();
        assert_eq!(entries.len(), 3);

        let canon = &entries[0];
        assert_eq!(canon.maker.as_deref(), Some("Canon"));
        assert_eq!(canon.focal_min, Some(24.0));
        assert_eq!(canon.focal_max, Some(70.0));
        assert_eq!(canon.aperture, Some(2.8));

        let nikon = &entries[1];
        assert_eq!(nikon.focal_min, Some(50.0));
        assert_eq!(nikon.focal_max, Some(50.0));

        assert!(entries[2].maker.is_none());
    }

    #[test]
    fn test_parse_from_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lenses.xml");
        fs::write(&path, SAMPLE).unwrap();

        let xml = fs::read_to_string(&path).unwrap();
        let entries = parse_lensfun(&xml).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_incomplete_entry_yields_no_spec() {
        let entry = LensEntry {
            model: Some("Orphan".to_string()),
            ..LensEntry::default()
        };
        assert!(entry.into_spec("test").is_none());
    }
}

mod labels;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use cpool::{
    DecodeObserver, DecodeOptions, Document, PropertyBag, PropertyValue, bags_are_duplicates,
    diff_documents, template,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cpool", about = "Inspect and verify character pool files")]
struct Cli {
    /// Require the `None` sentinel at the end of the root bag.
    #[arg(long, global = true)]
    strict: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the property tree of a pool file.
    Dump {
        file: PathBuf,
        /// Print JSON instead of the labelled tree.
        #[arg(long)]
        json: bool,
    },
    /// Decode and re-encode a pool file, and verify the bytes are unchanged.
    Check { file: PathBuf },
    /// Write an empty pool file.
    New {
        out: PathBuf,
        /// Pool name stored in the header. Defaults to the file stem.
        #[arg(long)]
        name: Option<String>,
    },
    /// List structural differences between two pool files.
    Diff { baseline: PathBuf, current: PathBuf },
    /// List pairs of identical characters.
    Duplicates { file: PathBuf },
}

/// Logs roster progress for large pools.
struct LogProgress;

impl DecodeObserver for LogProgress {
    fn element_decoded(&mut self, index: usize, total: usize) {
        let done = index + 1;
        if done % 100 == 0 || done == total {
            info!(done, total, "characters decoded");
        }
    }
}

fn load(path: &Path, options: &DecodeOptions) -> Result<Document> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Document::decode_with(&data, options, &mut LogProgress)
        .with_context(|| format!("failed to decode {}", path.display()))
}

fn cmd_dump(out: &mut impl Write, path: &Path, json: bool, options: &DecodeOptions) -> Result<()> {
    let doc = load(path, options)?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &doc)?;
        writeln!(out)?;
    } else {
        render_bag(out, &doc.root, 0)?;
    }
    Ok(())
}

fn render_bag(out: &mut impl Write, bag: &PropertyBag, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    for property in bag {
        let label = labels::label(&property.name);
        match &property.value {
            PropertyValue::Struct(s) => {
                writeln!(out, "{indent}{label} ({}):", s.type_name)?;
                render_bag(out, &s.body, depth + 1)?;
            }
            PropertyValue::Array(elements) => {
                writeln!(out, "{indent}{label}: {} elements", elements.len())?;
                for (i, element) in elements.iter().enumerate() {
                    writeln!(out, "{indent}  [{i}]")?;
                    render_bag(out, element, depth + 2)?;
                }
            }
            PropertyValue::CharacterRoster(roster) => {
                writeln!(out, "{indent}{label}: {}", roster.elements.len())?;
                render_bag(out, &roster.header, depth + 1)?;
                for (i, character) in roster.elements.iter().enumerate() {
                    writeln!(out, "{indent}  [{i}] {}", character_title(character))?;
                    render_bag(out, character, depth + 2)?;
                }
            }
            _ => writeln!(out, "{indent}{label}: {}", property.display())?,
        }
    }
    Ok(())
}

/// `First 'Nick' Last`, skipping empty parts.
fn character_title(character: &PropertyBag) -> String {
    let field = |name: &str| {
        character
            .find(name)
            .and_then(|p| p.as_text_or_name().ok())
            .filter(|s| !s.is_empty())
    };
    let nickname = field("strNickName").map(|n| format!("'{n}'"));
    [field("strFirstName").map(str::to_string), nickname, field("strLastName").map(str::to_string)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_difference(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .unwrap_or(a.len().min(b.len()))
}

fn cmd_check(out: &mut impl Write, path: &Path, options: &DecodeOptions) -> Result<()> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let doc = Document::decode_with(&data, options, &mut LogProgress)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    let encoded = doc
        .encode()
        .with_context(|| format!("failed to encode {}", path.display()))?;
    if encoded != data {
        bail!(
            "{}: re-encoded bytes differ at offset {:#x} ({} bytes read, {} written)",
            path.display(),
            first_difference(&data, &encoded),
            data.len(),
            encoded.len()
        );
    }
    writeln!(
        out,
        "{}: OK ({} characters, {} bytes)",
        path.display(),
        doc.character_count(),
        data.len()
    )?;
    Ok(())
}

fn cmd_new(out: &mut impl Write, path: &Path, name: Option<&str>) -> Result<()> {
    let name = match name {
        Some(name) => name.to_string(),
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let doc = template::new_pool(&name);
    let bytes = doc.encode()?;
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    writeln!(out, "Wrote empty pool {name:?} to {}", path.display())?;
    Ok(())
}

fn cmd_diff(
    out: &mut impl Write,
    baseline: &Path,
    current: &Path,
    options: &DecodeOptions,
) -> Result<()> {
    let baseline = load(baseline, options)?;
    let current = load(current, options)?;
    let changes = diff_documents(&baseline, &current);
    if changes.is_empty() {
        writeln!(out, "no changes")?;
    }
    for change in changes {
        writeln!(out, "{:?} {}", change.kind, change.path)?;
    }
    Ok(())
}

fn cmd_duplicates(out: &mut impl Write, path: &Path, options: &DecodeOptions) -> Result<()> {
    let doc = load(path, options)?;
    let characters = doc.characters();
    let mut pairs = 0;
    for (i, a) in characters.iter().enumerate() {
        for (j, b) in characters.iter().enumerate().skip(i + 1) {
            if bags_are_duplicates(a, b) {
                writeln!(out, "[{i}] and [{j}]: {}", character_title(a))?;
                pairs += 1;
            }
        }
    }
    writeln!(out, "{pairs} duplicate pair(s)")?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = if cli.strict {
        DecodeOptions::strict()
    } else {
        DecodeOptions::default()
    };
    let mut out = io::stdout().lock();
    match &cli.command {
        Command::Dump { file, json } => cmd_dump(&mut out, file, *json, &options),
        Command::Check { file } => cmd_check(&mut out, file, &options),
        Command::New { out: path, name } => cmd_new(&mut out, path, name.as_deref()),
        Command::Diff { baseline, current } => cmd_diff(&mut out, baseline, current, &options),
        Command::Duplicates { file } => cmd_duplicates(&mut out, file, &options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use cpool::Property;

    fn write_pool(dir: &Path, file: &str, characters: Vec<PropertyBag>) -> PathBuf {
        let mut doc = template::new_pool("Test Pool");
        doc.character_pool_mut().unwrap().elements = characters;
        let path = dir.join(file);
        fs::write(&path, doc.encode().unwrap()).unwrap();
        path
    }

    fn run(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn new_then_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Squad.bin");
        let created = run(|out| cmd_new(out, &path, None));
        assert!(created.contains("\"Squad\""));

        let checked = run(|out| cmd_check(out, &path, &DecodeOptions::default()));
        assert!(checked.contains("OK (0 characters"));

        let doc = Document::decode(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(doc.pool_file_name(), Some("Squad"));
    }

    #[test]
    fn check_reports_first_difference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.bin");
        // Root bag written without its sentinel.
        let mut bytes = cpool::encode(&PropertyBag::from(vec![Property::int32("Version", 1)])).unwrap();
        bytes.truncate(bytes.len() - 13);
        fs::write(&path, &bytes).unwrap();

        let err = cmd_check(&mut io::sink(), &path, &DecodeOptions::default()).unwrap_err();
        assert!(err.to_string().contains(&format!("offset {:#x}", bytes.len())));

        let err = cmd_check(&mut io::sink(), &path, &DecodeOptions::strict()).unwrap_err();
        assert!(err.to_string().contains("failed to decode"));
    }

    #[test]
    fn dump_uses_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pool(
            dir.path(),
            "pool.bin",
            vec![template::new_character("Sparky", "2026-10-15")],
        );
        let text = run(|out| cmd_dump(out, &path, false, &DecodeOptions::default()));
        assert!(text.contains("Character Count: 1"));
        assert!(text.contains("  File Name: Test Pool"));
        assert!(text.contains("  [0] New 'Sparky'"));
        assert!(text.contains("Nickname: Sparky"));
        assert!(text.contains("Appearance (TAppearance):"));
        assert!(text.contains("Can Be Soldier: true"));
    }

    #[test]
    fn dump_json_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pool(dir.path(), "pool.bin", Vec::new());
        let text = run(|out| cmd_dump(out, &path, true, &DecodeOptions::default()));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["root"][0]["name"], "CharacterPool");
    }

    #[test]
    fn diff_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let a = template::new_character("Ghost", "2026-10-15");
        let baseline = write_pool(dir.path(), "a.bin", vec![a.clone(), a.clone()]);

        let mut edited = a.clone();
        *edited.find_mut("strNickName").unwrap().as_text_mut().unwrap() = "Shade".into();
        let current = write_pool(dir.path(), "b.bin", vec![a, edited]);

        let options = DecodeOptions::default();
        let diff = run(|out| cmd_diff(out, &baseline, &current, &options));
        assert_eq!(diff.trim(), "Modified CharacterPool/[1]/strNickName");
        let same = run(|out| cmd_diff(out, &baseline, &baseline, &options));
        assert_eq!(same.trim(), "no changes");

        let dups = run(|out| cmd_duplicates(out, &baseline, &options));
        assert!(dups.contains("[0] and [1]: New 'Ghost'"));
        assert!(dups.contains("1 duplicate pair(s)"));
        let none = run(|out| cmd_duplicates(out, &current, &options));
        assert!(none.contains("0 duplicate pair(s)"));
    }

    #[test]
    fn title_skips_empty_parts() {
        let bag = PropertyBag::from(vec![
            Property::text("strFirstName", "Jane"),
            Property::text("strLastName", "Doe"),
            Property::text("strNickName", ""),
        ]);
        assert_eq!(character_title(&bag), "Jane Doe");
    }

    #[test]
    fn first_difference_offsets() {
        assert_eq!(first_difference(b"abc", b"abd"), 2);
        assert_eq!(first_difference(b"ab", b"abc"), 2);
        assert_eq!(first_difference(b"abc", b"abc"), 3);
    }
}

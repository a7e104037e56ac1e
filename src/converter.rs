use crate::cli::Cli;
use anyhow::{bail, Context, Result};
use chapterize::formats::{self, Format};
use chapterize::metadata::{self, Metadata};
use chapterize::{encode_chapters, extract_path, words, Classifier, Extracted};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Characters that cannot appear in exported file names.
const UNSAFE_FILENAME_CHARS: &[char] = &['/', '\\', '?', '%', '*', '|', '"', '<', '>'];

/// Import every input independently; one failure does not stop the batch.
pub fn convert(cli: &Cli, classifier: &Classifier) -> Result<()> {
    if cli.formats {
        println!("{}", formats::supported_extensions_lines());
        return Ok(());
    }

    let output_dir = cli.output.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut failed = 0usize;

    for input in &cli.inputs {
        if let Err(err) = convert_one(input, &output_dir, cli.info, classifier) {
            failed += 1;
            error!(path = %input.display(), "{err:#}");
            eprintln!("{}: {err:#}", input.display());
        }
    }

    let imported = cli.inputs.len() - failed;
    info!(imported, failed, "Batch finished");
    if !cli.info {
        eprintln!(
            "Imported {} of {} file{} to {}",
            imported,
            cli.inputs.len(),
            if cli.inputs.len() == 1 { "" } else { "s" },
            output_dir.display()
        );
    }

    if failed > 0 {
        bail!("{failed} file(s) could not be imported");
    }
    Ok(())
}

fn convert_one(input: &Path, output_dir: &Path, info_only: bool, classifier: &Classifier) -> Result<()> {
    let format = Format::from_path(input).with_context(|| {
        format!(
            "Unsupported file type (expected {})",
            formats::supported_extensions_sentence()
        )
    })?;
    let extracted = extract_path(input, classifier)
        .with_context(|| format!("Failed to import {}", input.display()))?;
    let metadata = metadata::read_metadata(input, format);

    if info_only {
        print!("{}", describe(&metadata, &extracted));
        return Ok(());
    }

    let name = output_name(input, &metadata)?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let text_path = output_dir.join(format!("{name}.txt"));
    fs::write(&text_path, extracted.full_text())
        .with_context(|| format!("Failed to write output file: {}", text_path.display()))?;

    if let Extracted::Book(book) = &extracted {
        let chapters_path = output_dir.join(format!("{name}.chapters.json"));
        let blob = encode_chapters(&book.chapters)?;
        fs::write(&chapters_path, blob)
            .with_context(|| format!("Failed to write chapters: {}", chapters_path.display()))?;
    }

    info!(
        input = %input.display(),
        output = %text_path.display(),
        chapters = extracted.chapters().len(),
        "Wrote extracted text"
    );
    Ok(())
}

/// Metadata header, word count and the chapter outline keyed by word index.
fn describe(metadata: &Metadata, extracted: &Extracted) -> String {
    let mut out = metadata::format_metadata(metadata);
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&format!(
        "Words: {}\n",
        words::count_words(extracted.full_text())
    ));

    let chapters = extracted.chapters();
    if !chapters.is_empty() {
        out.push_str("\nChapters\n");
        for (i, chapter) in chapters.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {:>8}  {}\n",
                i + 1,
                chapter.start_position,
                chapter.title
            ));
        }
    }
    out
}

fn output_name(input: &Path, metadata: &Metadata) -> Result<String> {
    let stem = match metadata.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => input
            .file_stem()
            .context("Input file has no name")?
            .to_string_lossy()
            .into_owned(),
    };
    Ok(sanitize_filename(&stem))
}

/// Replace every character that is unsafe in a file name with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if UNSAFE_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chapterize::{Chapter, ExtractionResult};

    #[test]
    fn unsafe_characters_become_underscores() {
        assert_eq!(sanitize_filename(r#"a/b\c?d%e*f|g"h<i>j"#), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_filename("Plain: Title"), "Plain: Title");
    }

    #[test]
    fn output_name_prefers_metadata_title() {
        let metadata = Metadata {
            title: Some("Either/Or".into()),
            ..Metadata::default()
        };
        assert_eq!(
            output_name(Path::new("dir/file.epub"), &metadata).unwrap(),
            "Either_Or"
        );
        assert_eq!(
            output_name(Path::new("dir/file.epub"), &Metadata::default()).unwrap(),
            "file"
        );
    }

    #[test]
    fn description_lists_chapter_positions() {
        let extracted = Extracted::Book(ExtractionResult {
            full_text: "a b c d".into(),
            chapters: vec![
                Chapter {
                    title: "First".into(),
                    start_position: 0,
                    href: "1.xhtml".into(),
                },
                Chapter {
                    title: "Second".into(),
                    start_position: 2,
                    href: "2.xhtml".into(),
                },
            ],
        });
        let text = describe(&Metadata::default(), &extracted);
        assert!(text.starts_with("Words: 4\n"));
        assert!(text.contains("  1.        0  First\n"));
        assert!(text.contains("  2.        2  Second\n"));
    }

    #[test]
    fn batch_continues_after_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        fs::write(&good, "some words here").unwrap();
        let out = dir.path().join("out");
        let cli = Cli {
            inputs: vec![dir.path().join("bad.mobi"), good],
            output: Some(out.clone()),
            config: PathBuf::from("unused.toml"),
            info: false,
            formats: false,
        };
        assert!(convert(&cli, Classifier::shared()).is_err());
        assert_eq!(
            fs::read_to_string(out.join("good.txt")).unwrap(),
            "some words here"
        );
    }
}

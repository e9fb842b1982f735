//! Download commands.

use std::path::Path;
use tokio::runtime::Runtime;

use super::fail;
use crate::error::ResultExt;
use crate::session::{self, DownloadReport, Downloaded, Session, TrackOutcome};

/// Download a song by id, or everything a catalog link points at
pub fn cmd_download(rt: &Runtime, session: &Session, target: &str) -> anyhow::Result<()> {
    let target = target.trim();
    println!("Processing {}...", target);

    if is_link(target) {
        let downloaded = rt.block_on(session.download_link(target)).map_err(fail)?;
        print_downloaded(&downloaded);
    } else {
        let path = rt.block_on(session.download_song(target)).map_err(fail)?;
        println!("Saved {}", path.display());
    }
    Ok(())
}

/// Download every link listed in `file`, continuing past failures
pub fn cmd_batch(rt: &Runtime, session: &Session, file: &Path) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(format!("reading {}", file.display()))
        .map_err(fail)?;
    let links = batch_links(&contents);
    if links.is_empty() {
        println!("No links found in {}", file.display());
        return Ok(());
    }

    let mut ok = 0;
    let mut failed = 0;
    for (n, link) in links.iter().enumerate() {
        println!("[{}/{}] {}", n + 1, links.len(), link);
        match rt.block_on(session.download_link(link)) {
            Ok(downloaded) => {
                print_downloaded(&downloaded);
                ok += 1;
            }
            Err(e) => {
                eprintln!("  ✗ {}", session::describe(&e));
                failed += 1;
            }
        }
    }

    println!();
    println!("Completed: {} successful, {} errors", ok, failed);
    Ok(())
}

/// Non-blank, non-comment lines of a batch file.
fn batch_links(contents: &str) -> Vec<&str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

fn is_link(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

fn print_downloaded(downloaded: &Downloaded) {
    match downloaded {
        Downloaded::Song(path) => println!("  ✓ Saved {}", path.display()),
        Downloaded::Collection(report) => print_report(report),
    }
}

fn print_report(report: &DownloadReport) {
    if report.available as usize > report.outcomes.len() {
        println!(
            "  Found {} songs, downloaded the first {}",
            report.available,
            report.outcomes.len()
        );
    }
    for outcome in &report.outcomes {
        match outcome {
            TrackOutcome::Saved(path) => println!("  ✓ {}", path.display()),
            TrackOutcome::Failed { title, message } => {
                eprintln!("  ✗ Failed to download {}: {}", title, message)
            }
        }
    }
    println!("  {}", report.summary());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_links_skip_blanks_and_comments() {
        let contents = "\
# weekend mix
https://www.jiosaavn.com/song/tum-hi-ho/EToxUyFpcwQ

   https://www.jiosaavn.com/album/aashiqui-2/xe6Gx7Sg12U_
#https://www.jiosaavn.com/artist/x/1
";
        assert_eq!(
            batch_links(contents),
            vec![
                "https://www.jiosaavn.com/song/tum-hi-ho/EToxUyFpcwQ",
                "https://www.jiosaavn.com/album/aashiqui-2/xe6Gx7Sg12U_",
            ]
        );
    }

    #[test]
    fn test_is_link() {
        assert!(is_link("https://www.jiosaavn.com/song/x/1"));
        assert!(is_link("http://jiosaavn.com/song/x/1"));
        assert!(!is_link("EToxUyFpcwQ"));
    }
}

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::Error;
use crate::Result;
use crate::parse::Site;

pub const DEFAULT_OUTPUT_PATH: &str = "top_alexa.json";

/// Country rank to domain, in rank order.
pub type Ranking = BTreeMap<u32, String>;

pub fn merge_sites(ranking: &mut Ranking, sites: &[Site]) {
    ranking.extend(sites.iter().map(|site| (site.rank, site.domain.clone())));
}

pub fn print_sites<W: Write>(out: &mut W, sites: &[Site]) -> Result<()> {
    for site in sites {
        writeln!(out, "{} {}", site.rank, site.domain)?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_json(path: &Path, ranking: &Ranking) -> Result<()> {
    info!(path = %path.display(), entries = ranking.len(), "writing ranking");

    let output_error = |source| Error::Output {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(output_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, ranking)?;
    writeln!(writer).map_err(output_error)?;
    writer.flush().map_err(output_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(rank: u32, domain: &str) -> Site {
        Site {
            domain: domain.to_string(),
            rank,
            global_rank: None,
        }
    }

    #[test]
    fn test_print_sites() {
        let mut out = Vec::new();
        print_sites(&mut out, &[site(1, "google.com"), site(2, "youtube.com")]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 google.com\n2 youtube.com\n");
    }

    #[test]
    fn test_merge_keeps_rank_order() {
        let mut ranking = Ranking::new();
        merge_sites(&mut ranking, &[site(1001, "b.com")]);
        merge_sites(&mut ranking, &[site(2, "a.com"), site(1, "z.com")]);
        let domains: Vec<&str> = ranking.values().map(String::as_str).collect();
        assert_eq!(domains, vec!["z.com", "a.com", "b.com"]);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.json");
        let mut ranking = Ranking::new();
        merge_sites(&mut ranking, &[site(1, "google.com"), site(2, "youtube.com")]);

        write_json(&path, &ranking).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "1": "google.com", "2": "youtube.com" })
        );
    }

    #[test]
    fn test_write_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("top.json");
        match write_json(&path, &Ranking::new()) {
            Err(Error::Output { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Output error, got {other:?}"),
        }
    }
}

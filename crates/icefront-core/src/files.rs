use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use log::debug;

use crate::FlowError;

/// Suffix marking a list file.
pub const LIST_FILE_SUFFIX: &str = ".f";

/// Flattens the input list, expanding every `.f` list file one level deep.
///
/// Lines of a list file are relative to the directory holding the list file.
pub fn resolve_file_list<P: AsRef<Path>>(entries: &[P]) -> Result<Vec<PathBuf>, FlowError> {
    let mut out = Vec::new();

    for entry in entries {
        let entry = entry.as_ref();
        if is_list_file(entry) {
            out.extend(extract_list_file(entry)?);
        } else {
            out.push(entry.to_path_buf());
        }
    }

    debug!("Resolved {} input files", out.len());

    Ok(out)
}

fn is_list_file(path: &Path) -> bool {
    path.to_string_lossy().ends_with(LIST_FILE_SUFFIX)
}

fn extract_list_file(path: &Path) -> Result<Vec<PathBuf>, FlowError> {
    let file =
        File::open(path).map_err(|err| FlowError::FailedToOpenListFile(path.to_path_buf(), err))?;
    let root = path.parent().unwrap_or_else(|| Path::new(""));

    let mut out = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|err| FlowError::FailedToOpenListFile(path.to_path_buf(), err))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        out.push(root.join(line));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn flat_list_is_unchanged() {
        let entries = ["top.v", "rtl/uart.v", "pins.pcf"];
        let resolved = resolve_file_list(&entries).unwrap();
        assert_eq!(
            resolved,
            entries.iter().map(PathBuf::from).collect::<Vec<_>>()
        );
    }

    #[test]
    fn list_file_is_relative_to_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let rtl = dir.path().join("rtl");
        fs::create_dir(&rtl).unwrap();
        let list = rtl.join("sources.f");
        fs::write(&list, "cpu.v\n  alu.v  \n\nsub/regs.v\n").unwrap();

        let entries = vec![PathBuf::from("top.v"), list, PathBuf::from("tb.v")];
        let resolved = resolve_file_list(&entries).unwrap();

        assert_eq!(
            resolved,
            vec![
                PathBuf::from("top.v"),
                rtl.join("cpu.v"),
                rtl.join("alu.v"),
                rtl.join("sub/regs.v"),
                PathBuf::from("tb.v"),
            ]
        );
    }

    #[test]
    fn nested_list_files_are_not_expanded() {
        let dir = tempfile::tempdir().unwrap();
        let outer = dir.path().join("outer.f");
        fs::write(dir.path().join("inner.f"), "never.v\n").unwrap();
        fs::write(&outer, "inner.f\n").unwrap();

        let resolved = resolve_file_list(&[outer]).unwrap();
        assert_eq!(resolved, vec![dir.path().join("inner.f")]);
    }

    #[test]
    fn missing_list_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.f");
        assert!(matches!(
            resolve_file_list(&[missing]),
            Err(FlowError::FailedToOpenListFile(..))
        ));
    }
}

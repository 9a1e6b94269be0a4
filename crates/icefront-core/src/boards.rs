use std::{
    collections::BTreeMap,
    fmt,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use serde::Deserialize;

use crate::FlowError;

/// Default clock constraint of a board. The registry may spell it either as a
/// string or as a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Speed {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speed::Number(n) => write!(f, "{}", n),
            Speed::Text(s) => f.write_str(s),
        }
    }
}

/// One entry of the board registry.
///
/// Every field is optional. A missing field leaves its placeholder untouched
/// in the command templates instead of failing the load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BoardRecord {
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub speed: Option<Speed>,
    /// File name of the pin constraint file, relative to the pcf directory
    #[serde(default)]
    pub pcf: Option<String>,
    /// Command templates, executed in order
    #[serde(default)]
    pub cmd: Vec<String>,
}

/// Every board known to the runner, keyed by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct BoardRegistry {
    boards: BTreeMap<String, BoardRecord>,
}

impl BoardRegistry {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FlowError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|err| FlowError::FailedToReadConfig(path.to_path_buf(), err))?;

        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, FlowError> {
        serde_json::from_reader(reader).map_err(FlowError::FailedToParseConfig)
    }

    /// Looks up a board, reporting every valid name when it is missing.
    pub fn get(&self, name: &str) -> Result<&BoardRecord, FlowError> {
        self.boards.get(name).ok_or_else(|| FlowError::UnknownBoard {
            name: name.to_string(),
            known: self.names().map(str::to_string).collect(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.boards.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const REGISTRY: &str = r#"{
        "icebreaker": {
            "package": "sg48",
            "device": "up5k",
            "speed": "12",
            "pcf": "icebreaker.pcf",
            "cmd": ["yosys -q -p \"synth_ice40 -top %top% -json %json%\" %files%", "icepack %asc% %bin%"]
        },
        "alhambra": {
            "package": "tq144",
            "device": "hx8k",
            "speed": 12,
            "pcf": "alhambra.pcf",
            "cmd": []
        }
    }"#;

    #[test]
    fn parses_registry() {
        let registry = BoardRegistry::from_reader(REGISTRY.as_bytes()).unwrap();
        assert_eq!(registry.len(), 2);

        let board = registry.get("icebreaker").unwrap();
        assert_eq!(board.package.as_deref(), Some("sg48"));
        assert_eq!(board.device.as_deref(), Some("up5k"));
        assert_eq!(board.speed, Some(Speed::Text("12".to_string())));
        assert_eq!(board.cmd.len(), 2);
    }

    #[test]
    fn numeric_speed_is_rendered_as_text() {
        let registry = BoardRegistry::from_reader(REGISTRY.as_bytes()).unwrap();
        let board = registry.get("alhambra").unwrap();
        assert_eq!(board.speed.as_ref().unwrap().to_string(), "12");
    }

    #[test]
    fn fractional_speed_does_not_spoil_the_registry() {
        let json = r#"{
            "icebreaker": {"speed": "12"},
            "fast": {"device": "up5k", "speed": 48.5}
        }"#;
        let registry = BoardRegistry::from_reader(json.as_bytes()).unwrap();

        assert_eq!(registry.len(), 2);
        let fast = registry.get("fast").unwrap();
        assert_eq!(fast.speed.as_ref().unwrap().to_string(), "48.5");
        assert!(registry.get("icebreaker").is_ok());
    }

    #[test]
    fn empty_registry() {
        let registry = BoardRegistry::from_reader("{}".as_bytes()).unwrap();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.get("icebreaker"),
            Err(FlowError::UnknownBoard { known, .. }) if known.is_empty()
        ));
    }

    #[test]
    fn missing_fields_are_not_an_error() {
        let registry = BoardRegistry::from_reader(r#"{"bare": {}}"#.as_bytes()).unwrap();
        assert_eq!(registry.get("bare").unwrap(), &BoardRecord::default());
    }

    #[test]
    fn unknown_board_lists_every_name() {
        let registry = BoardRegistry::from_reader(REGISTRY.as_bytes()).unwrap();
        match registry.get("nope") {
            Err(FlowError::UnknownBoard { name, known }) => {
                assert_eq!(name, "nope");
                assert_eq!(known, vec!["alhambra", "icebreaker"]);
            }
            other => panic!("expected UnknownBoard, got {:?}", other),
        }
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        assert!(matches!(
            BoardRegistry::from_reader("[1, 2, 3]".as_bytes()),
            Err(FlowError::FailedToParseConfig(_))
        ));
        assert!(matches!(
            BoardRegistry::from_reader("{\"a\": ".as_bytes()),
            Err(FlowError::FailedToParseConfig(_))
        ));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boards.json");
        File::create(&path)
            .unwrap()
            .write_all(REGISTRY.as_bytes())
            .unwrap();

        let registry = BoardRegistry::load(&path).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["alhambra", "icebreaker"]);
    }

    #[test]
    fn missing_document_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            BoardRegistry::load(dir.path().join("boards.json")),
            Err(FlowError::FailedToReadConfig(..))
        ));
    }
}

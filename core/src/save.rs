use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use sha2::{Digest, Sha512};

use crate::*;

/// Extension every save file ends with.
pub const SAVE_FILE_EXTENSION: &str = "sav";

/// Mine layout of a game, identified by the SHA-512 digest of its data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Save {
    id: String,
    data: SaveData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SaveData {
    mines: Vec<Pos>,
    difficulty: Difficulty,
}

impl SaveData {
    fn digest(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha512::digest(&bytes)))
    }
}

impl Save {
    /// Snapshot of the mine layout of `game`, progress is not recorded.
    pub fn from_game(game: &Game) -> Result<Self> {
        let data = SaveData {
            mines: game.mines(),
            difficulty: game.difficulty().clone(),
        };
        Ok(Self {
            id: data.digest()?,
            data,
        })
    }

    /// Decodes a save, rejecting mines that do not fit the stored difficulty.
    ///
    /// The id is not checked, see [`Save::verify`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let save: Self = serde_json::from_slice(bytes)?;
        if let Some(&pos) = save
            .data
            .mines
            .iter()
            .find(|pos| !pos.in_bounds(&save.data.difficulty))
        {
            return Err(GameError::MineOutOfBounds(pos));
        }
        Ok(save)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading save from {}", path.display());
        Self::from_slice(&fs::read(path)?)
    }

    /// Writes the save as indented JSON, appending the `.sav` extension when missing.
    ///
    /// Returns the path that was actually written.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = with_save_extension(path.as_ref());
        fs::write(&path, self.to_vec_pretty()?)?;
        log::info!("Saved game {} to {}", self.short_id(), path.display());
        Ok(path)
    }

    /// File contents of this save.
    pub fn to_vec_pretty(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
        self.serialize(&mut serializer)?;
        Ok(bytes)
    }

    /// Whether the id still matches the saved data.
    pub fn verify(&self) -> Result<bool> {
        Ok(self.data.digest()? == self.id)
    }

    /// Fresh game with the saved layout, flagged as a replay.
    pub fn game(&self) -> Game {
        let mut game = Game::from_mines(
            self.data.difficulty.clone(),
            self.data.mines.iter().copied(),
        );
        game.mark_replay();
        game
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mines(&self) -> &[Pos] {
        &self.data.mines
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.data.difficulty
    }

    fn short_id(&self) -> &str {
        self.id.get(..12).unwrap_or(&self.id)
    }
}

fn with_save_extension(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == SAVE_FILE_EXTENSION) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(SAVE_FILE_EXTENSION);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;
    use crate::engine::tests::{FIXTURE_MINES, fixture};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("minesweeper-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn id_is_sha512_of_compact_data() {
        let save = fixture().to_save().unwrap();

        assert_eq!(save.id().len(), 128);
        assert!(save.id().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        let compact = serde_json::to_vec(&save.data).unwrap();
        assert_eq!(save.id(), hex::encode(Sha512::digest(&compact)));
        assert!(save.verify().unwrap());
    }

    #[test]
    fn json_layout_uses_save_file_keys() {
        let save = Game::with_mines(Difficulty::classic(), &[Pos::new(1, 2)])
            .unwrap()
            .to_save()
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&save.to_vec_pretty().unwrap()).unwrap();

        assert_eq!(
            value["data"],
            serde_json::json!({
                "mines": [{"X": 1, "Y": 2}],
                "difficulty": {"Name": "Classic", "Row": 8, "Col": 8, "Mines": 9},
            })
        );
        assert_eq!(value["id"], save.id());
    }

    #[test]
    fn pretty_output_is_indented_with_four_spaces() {
        let save = fixture().to_save().unwrap();

        let text = String::from_utf8(save.to_vec_pretty().unwrap()).unwrap();

        assert!(text.starts_with("{\n    \"id\": "));
        assert!(text.contains("\n        \"mines\": ["));
    }

    #[test]
    fn bytes_round_trip_keeps_layout() {
        let mut game = fixture();
        let save = game.to_save().unwrap();
        assert!(game.is_replay());

        let loaded = Save::from_slice(&save.to_vec_pretty().unwrap()).unwrap();

        assert_eq!(loaded, save);
        let replay = loaded.game();
        assert!(replay.is_replay());
        assert!(replay.status().is_none());
        assert_eq!(replay.mines(), FIXTURE_MINES.to_vec());
        assert_eq!(replay.difficulty(), &Difficulty::classic());
    }

    #[test]
    fn file_round_trip_appends_extension() {
        let dir = scratch_dir("round-trip");
        let save = fixture().to_save().unwrap();

        let written = save.write(dir.join("fixture")).unwrap();

        assert_eq!(written, dir.join("fixture.sav"));
        assert_eq!(Save::load(&written).unwrap(), save);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn extension_handling() {
        assert_eq!(
            with_save_extension(Path::new("game.sav")),
            PathBuf::from("game.sav")
        );
        assert_eq!(
            with_save_extension(Path::new("game.json")),
            PathBuf::from("game.json.sav")
        );
        assert_eq!(
            with_save_extension(Path::new("dir/game")),
            PathBuf::from("dir/game.sav")
        );
    }

    #[test]
    fn out_of_bounds_mine_is_rejected() {
        let bytes = br#"{
            "id": "",
            "data": {
                "mines": [{"X": 0, "Y": 0}, {"X": 8, "Y": 3}],
                "difficulty": {"Name": "Classic", "Row": 8, "Col": 8, "Mines": 9}
            }
        }"#;

        let err = Save::from_slice(bytes).unwrap_err();

        assert!(matches!(err, GameError::MineOutOfBounds(pos) if pos == Pos::new(8, 3)));
    }

    #[test]
    fn tampered_save_fails_verification() {
        let save = fixture().to_save().unwrap();
        let mut value: serde_json::Value =
            serde_json::from_slice(&save.to_vec_pretty().unwrap()).unwrap();
        value["data"]["mines"][0]["Y"] = serde_json::json!(1);

        let tampered = Save::from_slice(&serde_json::to_vec(&value).unwrap()).unwrap();

        assert!(!tampered.verify().unwrap());
    }

    #[test]
    fn malformed_and_missing_files_fail() {
        assert!(matches!(
            Save::from_slice(b"{\"id\": 3}"),
            Err(GameError::MalformedSave(_))
        ));

        let dir = scratch_dir("missing");
        assert!(matches!(
            Save::load(dir.join("nope.sav")),
            Err(GameError::Io(_))
        ));
        fs::remove_dir_all(dir).unwrap();
    }
}

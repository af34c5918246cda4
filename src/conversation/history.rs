use crate::core::error::ChatError;
use crate::providers::Message;
use std::fs;
use std::path::{Path, PathBuf};

/// Saved conversations live as pretty JSON arrays of messages in one
/// directory. Names are plain file names; anything path-like is refused.
pub struct HistoryDir {
    root: PathBuf,
}

impl HistoryDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, ChatError> {
        let name = name.trim();
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(ChatError::Input(format!("Invalid history file name: {:?}", name)));
        }
        Ok(self.root.join(name))
    }

    pub fn default_name() -> String {
        chrono::Local::now().format("%Y%m%d_%H%M%S.json").to_string()
    }

    pub fn save(&self, name: &str, messages: &[Message]) -> Result<PathBuf, ChatError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.root)?;
        let file = fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, messages)?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<Vec<Message>, ChatError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(ChatError::Input(format!("File not found: {}", path.display())));
        }
        let file = fs::File::open(&path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn list(&self) -> Result<Vec<String>, ChatError> {
        fs::create_dir_all(&self.root)?;

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn delete(&self, name: &str) -> Result<PathBuf, ChatError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(ChatError::Input(format!("File not found: {}", path.display())));
        }
        fs::remove_file(&path)?;
        Ok(path)
    }
}

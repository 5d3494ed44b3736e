use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use chrono::Local;

// @module: File and directory utilities

/// Extensions offered by the client's audio file filter
pub const AUDIO_EXTENSIONS: [&str; 5] = ["wav", "mp3", "flac", "ogg", "m4a"];

// @struct: File type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Audio,
    Subtitle,
    Transcript,
    Other,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: SubRip output path next to the audio file
    // @params: audio_file, output_dir (defaults to the audio file's directory)
    pub fn srt_output_path<P: AsRef<Path>>(audio_file: P, output_dir: Option<&Path>) -> PathBuf {
        let audio_file = audio_file.as_ref();
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| audio_file.parent().map(Path::to_path_buf))
            .unwrap_or_default();

        dir.join(Self::default_srt_file_name(Some(audio_file)))
    }

    /// `<stem>.srt` for an audio file, or a timestamped name when there is none
    pub fn default_srt_file_name(audio_file: Option<&Path>) -> String {
        match audio_file.and_then(|p| p.file_stem()) {
            Some(stem) if !stem.is_empty() => format!("{}.srt", stem.to_string_lossy()),
            _ => format!("transcript_{}.srt", Local::now().format("%Y%m%d_%H%M%S")),
        }
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Classify a file by its extension
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let ext = match path.as_ref().extension() {
            Some(ext) => ext.to_string_lossy().to_lowercase(),
            None => return FileType::Other,
        };

        if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            FileType::Audio
        } else if ext == "srt" {
            FileType::Subtitle
        } else if ext == "json" {
            FileType::Transcript
        } else {
            FileType::Other
        }
    }
}

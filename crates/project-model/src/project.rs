//! Project metadata, editor settings, and project storage.
//!
//! A project ties together a reference to the immutable source recording,
//! the captured event stream, the editing timeline, and the settings that
//! drive automatic framing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::event::{parse_events, serialize_events, UserEvent};
use crate::timeline::{new_id, Timeline};
use crate::viewport::{Rect, Size};

/// Top-level project file (`project.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Schema version.
    pub version: String,

    /// Human-readable project name.
    pub name: String,

    /// Unique project identifier.
    pub id: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Last modified timestamp (ISO 8601).
    pub modified_at: String,

    /// Main screen recording. Absent until media has been attached.
    #[serde(default)]
    pub screen: Option<ScreenSource>,

    /// Optional camera recording paired with the screen.
    #[serde(default)]
    pub camera: Option<MediaRef>,

    /// Editor settings.
    #[serde(default)]
    pub settings: EditorSettings,
}

/// Metadata for the screen recording. Media bytes live elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenSource {
    /// Opaque media id resolved by the media store.
    pub media_id: String,

    /// Captured frame size in pixels.
    pub width: f64,
    pub height: f64,

    /// Length of the recording in milliseconds.
    pub duration_ms: f64,
}

impl ScreenSource {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Reference to an immutable media blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub media_id: String,

    /// Offset of this media relative to the screen recording (ms).
    #[serde(default)]
    pub offset_ms: f64,
}

/// Settings that influence framing and action scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    pub zoom: ZoomSettings,
    pub spotlight: SpotlightSettings,
    pub output_size: Size,
    pub screen: ScreenSettings,
}

/// Zoom track settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoomSettings {
    /// Largest magnification automatic framing may use.
    pub max_zoom: f64,
    /// Shortest allowed motion.
    pub min_zoom_duration_ms: f64,
    /// Default (and longest automatic) motion.
    pub max_zoom_duration_ms: f64,
    /// Whether the zoom track is still maintained automatically.
    ///
    /// Cleared for good by the first manual edit to the track.
    pub auto_zoom: bool,
}

/// Spotlight track settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpotlightSettings {
    /// Fade in/out length at each end of a spotlight.
    pub transition_duration_ms: f64,
    /// Default enlargement for new spotlights.
    pub enlarge_scale: f64,
}

/// Screen layer framing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenSettings {
    /// Padding around the screen layer as a fraction of the output size.
    pub padding: f64,
    /// Crop applied to the source frame, in source pixels.
    pub crop: Option<Rect>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            zoom: ZoomSettings::default(),
            spotlight: SpotlightSettings::default(),
            output_size: Size::new(1920.0, 1080.0),
            screen: ScreenSettings::default(),
        }
    }
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            max_zoom: 2.0,
            min_zoom_duration_ms: 500.0,
            max_zoom_duration_ms: 1500.0,
            auto_zoom: true,
        }
    }
}

impl Default for SpotlightSettings {
    fn default() -> Self {
        Self {
            transition_duration_ms: 300.0,
            enlarge_scale: 1.25,
        }
    }
}

impl EditorSettings {
    /// Whether switching from `self` to `next` changes anything the zoom
    /// schedule depends on.
    ///
    /// Padding only frames the screen layer inside the output, and toggling
    /// auto zoom is handled by the editor, so neither counts.
    pub fn affects_schedule(&self, next: &EditorSettings) -> bool {
        self.zoom.max_zoom != next.zoom.max_zoom
            || self.zoom.min_zoom_duration_ms != next.zoom.min_zoom_duration_ms
            || self.zoom.max_zoom_duration_ms != next.zoom.max_zoom_duration_ms
            || self.output_size != next.output_size
            || self.screen.crop != next.screen.crop
    }
}

/// The complete in-memory representation of a loaded project.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// Filesystem path to the project directory.
    pub root: PathBuf,

    /// Project metadata.
    pub project: Project,

    /// Editing timeline.
    pub timeline: Timeline,

    /// Recorded user events (read-only input).
    pub events: Vec<UserEvent>,
}

impl Project {
    /// Create a new project with defaults.
    pub fn new(name: impl Into<String>, screen: Option<ScreenSource>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: "1.0".to_string(),
            name: name.into(),
            id: new_id(),
            created_at: now.clone(),
            modified_at: now,
            screen,
            camera: None,
            settings: EditorSettings::default(),
        }
    }

    /// Bump the modification timestamp.
    pub fn touch(&mut self) {
        self.modified_at = chrono::Utc::now().to_rfc3339();
    }
}

impl LoadedProject {
    /// Load a project from a directory.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();
        let meta = root.join("meta");

        let project: Project = read_json(&meta.join("project.json"))?;

        let timeline_path = meta.join("timeline.json");
        let timeline = if timeline_path.exists() {
            read_json(&timeline_path)?
        } else {
            Timeline::for_recording(project.screen.as_ref().map_or(0.0, |s| s.duration_ms))
        };

        let events_path = meta.join("events.jsonl");
        let events = if events_path.exists() {
            let content = read_string(&events_path)?;
            parse_events(&content).map_err(|e| ProjectError::ParseError {
                path: events_path,
                source: e,
            })?
        } else {
            vec![]
        };

        Ok(Self {
            root,
            project,
            timeline,
            events,
        })
    }

    /// Save project, timeline and events into `self.root`.
    pub fn save(&self) -> Result<(), ProjectError> {
        self.save_to(&self.root)
    }

    /// Save project, timeline and events into an arbitrary directory.
    pub fn save_to(&self, root: &Path) -> Result<(), ProjectError> {
        let meta_dir = root.join("meta");
        std::fs::create_dir_all(&meta_dir).map_err(|e| ProjectError::IoError {
            path: meta_dir.clone(),
            source: e,
        })?;

        write_json(&meta_dir.join("project.json"), &self.project)?;
        write_json(&meta_dir.join("timeline.json"), &self.timeline)?;

        let events_path = meta_dir.join("events.jsonl");
        let jsonl = serialize_events(&self.events).map_err(|e| ProjectError::ParseError {
            path: events_path.clone(),
            source: e,
        })?;
        std::fs::write(&events_path, jsonl).map_err(|e| ProjectError::IoError {
            path: events_path,
            source: e,
        })?;

        Ok(())
    }

    /// Create a new project on disk, writing `meta/` with an untrimmed
    /// timeline for the recording.
    pub fn create(
        root: impl AsRef<Path>,
        name: impl Into<String>,
        screen: Option<ScreenSource>,
    ) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();
        let timeline = Timeline::for_recording(screen.as_ref().map_or(0.0, |s| s.duration_ms));
        let loaded = Self {
            root,
            project: Project::new(name, screen),
            timeline,
            events: vec![],
        };
        loaded.save()?;
        Ok(loaded)
    }

    /// Report structural problems in the loaded data.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.timeline.validate();

        match &self.project.screen {
            Some(screen) => {
                if let Some(last) = self.timeline.windows.last() {
                    if last.end_ms > screen.duration_ms {
                        errors.push(format!(
                            "Window {} ends at {}ms, past the recording ({}ms)",
                            last.id, last.end_ms, screen.duration_ms
                        ));
                    }
                }
            }
            None => errors.push("Screen source missing".to_string()),
        }

        if self.events.windows(2).any(|w| w[1].time_ms < w[0].time_ms) {
            errors.push("Events are not in chronological order".to_string());
        }

        errors
    }
}

/// Persistence contract for projects.
pub trait ProjectStore {
    /// Load a project by id.
    fn load_project(&self, id: &str) -> Result<LoadedProject, ProjectError>;

    /// Persist a project under its id.
    fn save_project(&self, project: &LoadedProject) -> Result<(), ProjectError>;
}

/// Stores each project in `<root>/<id>/meta/`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn project_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Ids of every project with a readable `project.json`.
    pub fn list_projects(&self) -> Result<Vec<String>, ProjectError> {
        if !self.root.exists() {
            return Ok(vec![]);
        }
        let entries = std::fs::read_dir(&self.root).map_err(|e| ProjectError::IoError {
            path: self.root.clone(),
            source: e,
        })?;

        let mut ids: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().join("meta").join("project.json").exists())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

impl ProjectStore for DirectoryStore {
    fn load_project(&self, id: &str) -> Result<LoadedProject, ProjectError> {
        let dir = self.project_dir(id);
        if !dir.join("meta").join("project.json").exists() {
            return Err(ProjectError::NotFound { id: id.to_string() });
        }
        LoadedProject::load(dir)
    }

    fn save_project(&self, project: &LoadedProject) -> Result<(), ProjectError> {
        project.save_to(&self.project_dir(&project.project.id))
    }
}

/// Errors that can occur when working with projects.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Project not found: {id}")]
    NotFound { id: String },
}

fn read_string(path: &Path) -> Result<String, ProjectError> {
    std::fs::read_to_string(path).map_err(|e| ProjectError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ProjectError> {
    let content = read_string(path)?;
    serde_json::from_str(&content).map_err(|e| ProjectError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ProjectError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ProjectError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::write(path, json).map_err(|e| ProjectError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

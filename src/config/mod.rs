use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{DEFAULT_HIT_RADIUS, DEFAULT_MEASUREMENT_COLOR, MAX_RECENT_IMAGES};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfigData {
    /// Colour for new measurements (packed 0xRRGGBB)
    pub default_color: u32,

    /// Control-point hit tolerance in screen pixels
    pub hit_radius: f32,

    /// Last opened image, reopened on startup when it still exists
    pub last_image_path: Option<PathBuf>,

    /// Recently opened images for quick access
    pub recent_images: Vec<PathBuf>,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_MEASUREMENT_COLOR,
            hit_radius: DEFAULT_HIT_RADIUS,
            last_image_path: None,
            recent_images: Vec::new(),
        }
    }
}

impl AppConfigData {
    /// Hit radius with nonsense values replaced by the default.
    pub fn effective_hit_radius(&self) -> f32 {
        if self.hit_radius.is_finite() && self.hit_radius > 0.0 {
            self.hit_radius
        } else {
            DEFAULT_HIT_RADIUS
        }
    }

    fn remember_image(&mut self, path: PathBuf) {
        self.recent_images.retain(|p| p != &path);
        self.recent_images.insert(0, path.clone());
        self.recent_images.truncate(MAX_RECENT_IMAGES);
        self.last_image_path = Some(path);
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Resource for the "image file missing" warning dialog
#[derive(Resource, Default)]
pub struct MissingImageWarning {
    pub show: bool,
    pub path: Option<PathBuf>,
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to remember an opened image
#[derive(Message)]
pub struct UpdateLastImagePathRequest {
    pub path: PathBuf,
}

/// Message to persist the default measurement colour
#[derive(Message)]
pub struct SetDefaultColorRequest {
    pub color: u32,
}

/// Result of loading config from disk
struct LoadConfigResult {
    data: AppConfigData,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

fn parse_config(json: &str) -> Result<AppConfigData, serde_json::Error> {
    serde_json::from_str(json)
}

/// Load configuration from disk
fn load_config(config_path: &std::path::Path) -> LoadConfigResult {
    if !config_path.exists() {
        info!("No config file found, using defaults");
        return LoadConfigResult {
            data: AppConfigData::default(),
            reset_reason: None,
        };
    }

    let (data, reset_reason) = match std::fs::read_to_string(config_path) {
        Ok(json) => match parse_config(&json) {
            Ok(data) => {
                info!("Loaded config from {:?}", config_path);
                (data, None)
            }
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                (
                    AppConfigData::default(),
                    Some(format!("Configuration file was corrupted: {}", e)),
                )
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Could not read configuration file: {}", e)),
            )
        }
    };

    LoadConfigResult { data, reset_reason }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_config(&config.config_path);
    config.data = result.data;
    config.dirty = false;

    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// Startup system to check if the last image still exists
fn check_last_image_exists(config: Res<AppConfig>, mut warning: ResMut<MissingImageWarning>) {
    if let Some(ref path) = config.data.last_image_path
        && !path.exists()
    {
        warning.show = true;
        warning.path = Some(path.clone());
        info!("Last opened image no longer exists: {:?}", path);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

fn update_last_image_path_system(
    mut events: MessageReader<UpdateLastImagePathRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.remember_image(event.path.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

fn set_default_color_system(
    mut events: MessageReader<SetDefaultColorRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        if config.data.default_color != event.color {
            config.data.default_color = event.color;
            config.dirty = true;
            save_events.write(SaveConfigRequest);
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<MissingImageWarning>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateLastImagePathRequest>()
            .add_message::<SetDefaultColorRequest>()
            .add_systems(
                Startup,
                (load_config_system, check_last_image_exists)
                    .chain()
                    .in_set(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    update_last_image_path_system.run_if(on_message::<UpdateLastImagePathRequest>),
                    set_default_color_system.run_if(on_message::<SetDefaultColorRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert_eq!(data.default_color, 0xe36209);
        assert_eq!(data.hit_radius, 10.0);
        assert!(data.last_image_path.is_none());
        assert!(data.recent_images.is_empty());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let data = parse_config(r#"{"last_image_path": "/tmp/slide.png"}"#).unwrap();
        assert_eq!(data.default_color, DEFAULT_MEASUREMENT_COLOR);
        assert_eq!(data.hit_radius, DEFAULT_HIT_RADIUS);
        assert_eq!(data.last_image_path, Some(PathBuf::from("/tmp/slide.png")));
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            default_color: 0x00ff00,
            hit_radius: 14.0,
            last_image_path: Some(PathBuf::from("/path/to/frame.png")),
            recent_images: vec![PathBuf::from("/path/one.png")],
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed = parse_config(&json).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_corrupt_config_is_an_error() {
        assert!(parse_config("{ not json").is_err());
    }

    #[test]
    fn test_effective_hit_radius() {
        let mut data = AppConfigData::default();
        data.hit_radius = -3.0;
        assert_eq!(data.effective_hit_radius(), DEFAULT_HIT_RADIUS);
        data.hit_radius = 6.0;
        assert_eq!(data.effective_hit_radius(), 6.0);
    }

    #[test]
    fn test_remember_image_moves_to_front() {
        let mut data = AppConfigData::default();
        for i in 0..(MAX_RECENT_IMAGES + 2) {
            data.remember_image(PathBuf::from(format!("/img/{i}.png")));
        }
        data.remember_image(PathBuf::from("/img/3.png"));

        assert_eq!(data.recent_images.len(), MAX_RECENT_IMAGES);
        assert_eq!(data.recent_images[0], PathBuf::from("/img/3.png"));
        assert_eq!(data.last_image_path, Some(PathBuf::from("/img/3.png")));
        assert_eq!(
            data.recent_images.iter().filter(|p| p.ends_with("3.png")).count(),
            1
        );
    }

    #[test]
    fn test_missing_image_warning_default() {
        let warning = MissingImageWarning::default();
        assert!(!warning.show);
        assert!(warning.path.is_none());
    }
}

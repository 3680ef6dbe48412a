use serde::{Deserialize, Serialize};
use validator::Validate;

/// Package manager enum as the backend encodes it (0=npm, 1=yarn, 2=pnpm).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
}

impl From<PackageManager> for u8 {
    fn from(value: PackageManager) -> Self {
        match value {
            PackageManager::Npm => 0,
            PackageManager::Yarn => 1,
            PackageManager::Pnpm => 2,
        }
    }
}

impl TryFrom<u8> for PackageManager {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PackageManager::Npm),
            1 => Ok(PackageManager::Yarn),
            2 => Ok(PackageManager::Pnpm),
            other => Err(format!("unknown package manager: {}", other)),
        }
    }
}

impl std::str::FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "npm" | "0" => Ok(PackageManager::Npm),
            "yarn" | "1" => Ok(PackageManager::Yarn),
            "pnpm" | "2" => Ok(PackageManager::Pnpm),
            other => Err(format!("unknown package manager: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDto {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub package_manager: PackageManager,
    #[serde(default)]
    pub url: Option<String>,
}

/// Admin request to register a package
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    pub version: Option<String>,
    pub package_manager: PackageManager,
    pub url: Option<String>,
}

//! Target platform resolution from the environment
//!
//! Three-way precedence: an explicit cross-toolchain triple wins, then a
//! vcpkg installation, then the plain native toolchain. The resolved
//! identifier keys the output directory layout and, for vcpkg builds,
//! carries the toolchain wiring for the configure step.

use std::env;
use std::path::PathBuf;

use crate::error::{hints, CvnError};

/// Cross-toolchain host triple (the dockcross convention)
pub const CROSS_TRIPLE: &str = "CROSS_TRIPLE";
/// vcpkg installation root
pub const VCPKG_ROOT: &str = "VCPKG_ROOT";
/// Default vcpkg target triplet
pub const VCPKG_DEFAULT_TRIPLET: &str = "VCPKG_DEFAULT_TRIPLET";

/// Platform identifier used when no cross or vcpkg environment is present
pub const NATIVE: &str = "native";

/// How missing environment variables are treated during resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvPolicy {
    /// Fall back to the native toolchain when vcpkg variables are unset
    #[default]
    Lenient,
    /// Hard-fail when VCPKG_ROOT or VCPKG_DEFAULT_TRIPLET is unset
    Strict,
}

/// Resolved target platform: identifier plus optional vcpkg wiring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Path segment and triplet value ("native" when nothing is detected)
    pub identifier: String,
    /// vcpkg toolchain file passed to the configure step, when active
    pub toolchain_file: Option<PathBuf>,
    /// vcpkg target triplet passed to the configure step, when known
    pub triplet: Option<String>,
}

impl Platform {
    /// Resolve the platform from the process environment
    pub fn resolve(policy: EnvPolicy) -> Result<Self, CvnError> {
        Self::resolve_with(policy, |name| env::var(name).ok())
    }

    /// Resolve the platform through an arbitrary variable lookup
    pub fn resolve_with<F>(policy: EnvPolicy, lookup: F) -> Result<Self, CvnError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        // An explicit cross triple bypasses vcpkg entirely.
        if let Some(triple) = get(CROSS_TRIPLE) {
            return Ok(Self {
                identifier: triple,
                toolchain_file: None,
                triplet: None,
            });
        }

        let Some(root) = get(VCPKG_ROOT) else {
            if policy == EnvPolicy::Strict {
                return Err(CvnError::missing_env(VCPKG_ROOT, hints::vcpkg_env()));
            }
            return Ok(Self::native());
        };

        let toolchain_file = PathBuf::from(root)
            .join("scripts")
            .join("buildsystems")
            .join("vcpkg.cmake");

        match get(VCPKG_DEFAULT_TRIPLET) {
            Some(triplet) => Ok(Self {
                identifier: triplet.clone(),
                toolchain_file: Some(toolchain_file),
                triplet: Some(triplet),
            }),
            None if policy == EnvPolicy::Strict => Err(CvnError::missing_env(
                VCPKG_DEFAULT_TRIPLET,
                hints::vcpkg_env(),
            )),
            // Lenient: keep the toolchain file, omit the triplet argument.
            None => Ok(Self {
                identifier: NATIVE.to_string(),
                toolchain_file: Some(toolchain_file),
                triplet: None,
            }),
        }
    }

    /// Platform with no cross or vcpkg integration
    pub fn native() -> Self {
        Self {
            identifier: NATIVE.to_string(),
            toolchain_file: None,
            triplet: None,
        }
    }

    /// CPU architecture alias for this platform
    ///
    /// The leading segment of the triplet, or the host architecture for
    /// "native". Feeds the IDE generator-platform lookup.
    pub fn arch(&self) -> &str {
        if self.identifier == NATIVE {
            std::env::consts::ARCH
        } else {
            self.identifier
                .split('-')
                .next()
                .unwrap_or(&self.identifier)
        }
    }
}

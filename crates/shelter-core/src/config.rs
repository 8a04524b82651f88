//! Canonical configurator state and its transition rules
//!
//! The configuration is a single structured value rather than a set of
//! named states: the deploy, view, color, and environment axes move
//! independently, with one cross-axis rule — the inside view is a
//! refinement of the interior view and is never valid in exterior mode.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::ColorValue;
use crate::presets::{EnvironmentPreset, LightingConfig};

/// Reason a state transition was rejected.
///
/// Rejections are ordinary return values, never panics: transitions run on
/// every UI click and must leave the interaction loop alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionRejection {
    #[error("Inside view requires interior view to be active")]
    InsideViewRequiresInterior,
}

/// The canonical, serializable state of one configurator session.
///
/// Invariant: `is_inside_view` implies `is_interior_view`. The invariant is
/// inferred from product behavior (an inside camera is a refinement of
/// showing the interior) and should be confirmed against desired UX before
/// it is relied on further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelterConfiguration {
    /// Currently selected customization color, if any
    pub selected_color: Option<ColorValue>,
    /// Deployed (expanded for use) vs stowed (packed for transport)
    pub is_deployed: bool,
    /// Show the internal compartment instead of the outer shell
    pub is_interior_view: bool,
    /// Camera placed inside the compartment; only valid in interior view
    pub is_inside_view: bool,
    /// Environment backdrop preset
    pub environment: EnvironmentPreset,
    /// Lighting parameters
    pub lighting: LightingConfig,
    /// Show the human scale-reference figure
    pub show_scale_figure: bool,
}

impl Default for ShelterConfiguration {
    fn default() -> Self {
        Self {
            selected_color: None,
            is_deployed: false,
            is_interior_view: false,
            is_inside_view: false,
            environment: EnvironmentPreset::default(),
            lighting: LightingConfig::default(),
            show_scale_figure: false,
        }
    }
}

impl ShelterConfiguration {
    /// Check the interior/inside cross-axis invariant
    pub fn is_valid(&self) -> bool {
        !self.is_inside_view || self.is_interior_view
    }
}

/// Owns one [`ShelterConfiguration`] and enforces its transition rules.
///
/// All mutations go through the transition methods; each one validates the
/// invariant and rejects or clamps violating updates instead of ever
/// producing an inconsistent state.
#[derive(Debug, Clone, Default)]
pub struct ConfigState {
    config: ShelterConfiguration,
}

impl ConfigState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current configuration
    pub fn config(&self) -> &ShelterConfiguration {
        &self.config
    }

    /// Select a customization color (pure state update; application to the
    /// scene is the view synchronizer's job)
    pub fn set_color(&mut self, color: ColorValue) {
        self.config.selected_color = Some(color);
    }

    /// Clear the color selection back to the factory finish
    pub fn clear_color(&mut self) {
        self.config.selected_color = None;
    }

    pub fn set_deployed(&mut self, deployed: bool) {
        self.config.is_deployed = deployed;
    }

    pub fn toggle_deployed(&mut self) {
        self.config.is_deployed = !self.config.is_deployed;
    }

    /// Enter or leave interior view. Leaving interior view clamps the
    /// inside view off; this is invariant enforcement, not an error.
    pub fn set_interior_view(&mut self, interior: bool) {
        self.config.is_interior_view = interior;
        if !interior {
            self.config.is_inside_view = false;
        }
    }

    pub fn toggle_interior_view(&mut self) {
        let next = !self.config.is_interior_view;
        self.set_interior_view(next);
    }

    /// Enter or leave the inside-camera view. Entering is rejected while
    /// the exterior is shown; callers must switch to interior view first.
    pub fn set_inside_view(&mut self, inside: bool) -> Result<(), TransitionRejection> {
        if inside && !self.config.is_interior_view {
            return Err(TransitionRejection::InsideViewRequiresInterior);
        }
        self.config.is_inside_view = inside;
        Ok(())
    }

    pub fn toggle_inside_view(&mut self) -> Result<(), TransitionRejection> {
        let next = !self.config.is_inside_view;
        self.set_inside_view(next)
    }

    pub fn set_environment(&mut self, preset: EnvironmentPreset) {
        self.config.environment = preset;
    }

    pub fn set_lighting(&mut self, lighting: LightingConfig) {
        self.config.lighting = lighting;
    }

    pub fn set_show_scale_figure(&mut self, show: bool) {
        self.config.show_scale_figure = show;
    }
}

//! Phase timeline for the impact event
//!
//! Five fixed, back-to-back phases sequence the visual reconstruction. The
//! timeline is a value object: regenerated from scratch whenever parameters
//! change, never mutated in place. Phase lookup is a pure function of elapsed
//! simulation time, so the host render loop owns scheduling - no timers or
//! delayed callbacks here.

use serde::{Deserialize, Serialize};

use crate::consts::MEGATON_JOULES;
use super::params::ImpactParameters;

/// Named stage of the impact event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Atmospheric entry streak
    Entry,
    /// Final descent, sonic boom, possible breakup
    Terminal,
    /// Detonation flash and burst
    Explosion,
    /// Excavation and ballistic ejecta
    CraterFormation,
    /// Lingering thermal glow and dust
    Thermal,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Entry,
        Phase::Terminal,
        Phase::Explosion,
        Phase::CraterFormation,
        Phase::Thermal,
    ];

    /// Constant duration of this phase (seconds)
    pub fn duration_s(&self) -> f32 {
        match self {
            Phase::Entry => 3.0,
            Phase::Terminal => 2.0,
            Phase::Explosion => 1.0,
            Phase::CraterFormation => 4.0,
            Phase::Thermal => 8.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Entry => "entry",
            Phase::Terminal => "terminal",
            Phase::Explosion => "explosion",
            Phase::CraterFormation => "crater formation",
            Phase::Thermal => "thermal",
        }
    }
}

/// Per-phase effect flags, computed once at generation time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PhaseFlags {
    /// Fragments shed during atmospheric transit (0 = body holds together)
    pub fragments: u32,
    /// Whether the phase carries an audible shock
    pub sonic_boom: bool,
    /// Whether the phase throws ballistic ejecta
    pub ejecta: bool,
    /// Relative visual intensity in [0, 1]
    pub intensity: f32,
}

/// One time-boxed phase within the event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSpan {
    pub phase: Phase,
    pub start_time_s: f32,
    pub duration_s: f32,
    pub flags: PhaseFlags,
}

impl PhaseSpan {
    pub fn end_time_s(&self) -> f32 {
        self.start_time_s + self.duration_s
    }
}

/// Ordered, gap-free sequence of the five phases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimeline {
    spans: Vec<PhaseSpan>,
}

impl PhaseTimeline {
    /// Derive the timeline from parameters and the total impact energy.
    ///
    /// Durations are constants; only the flag bags depend on the inputs.
    pub fn generate(params: &ImpactParameters, energy_joules: f64) -> Self {
        let megatons = energy_joules / MEGATON_JOULES;
        let intensity = energy_intensity(megatons);

        let fragments = if params.diameter_m < params.composition.breakup_diameter_m() {
            ((params.diameter_m / 10.0) as u32).clamp(3, 24)
        } else {
            0
        };
        let crater_forms = energy_joules > 0.0 && params.angle_deg > 0.0;

        let mut spans = Vec::with_capacity(Phase::ALL.len());
        let mut start = 0.0_f32;
        for phase in Phase::ALL {
            let flags = match phase {
                Phase::Entry => PhaseFlags {
                    intensity: (intensity * 0.5).max(0.1),
                    ..PhaseFlags::default()
                },
                Phase::Terminal => PhaseFlags {
                    fragments,
                    sonic_boom: params.velocity_kms > 1.0,
                    intensity: (intensity * 0.7).max(0.1),
                    ..PhaseFlags::default()
                },
                Phase::Explosion => PhaseFlags {
                    sonic_boom: true,
                    intensity,
                    ..PhaseFlags::default()
                },
                Phase::CraterFormation => PhaseFlags {
                    ejecta: crater_forms,
                    intensity: intensity * 0.8,
                    ..PhaseFlags::default()
                },
                Phase::Thermal => PhaseFlags {
                    intensity: intensity * 0.4,
                    ..PhaseFlags::default()
                },
            };
            spans.push(PhaseSpan {
                phase,
                start_time_s: start,
                duration_s: phase.duration_s(),
                flags,
            });
            start += phase.duration_s();
        }

        Self { spans }
    }

    pub fn spans(&self) -> &[PhaseSpan] {
        &self.spans
    }

    /// Sum of all phase durations (18 s for the fixed structure)
    pub fn total_duration_s(&self) -> f32 {
        self.spans.iter().map(|s| s.duration_s).sum()
    }

    /// Active phase at `elapsed_s`, or `None` before t=0 / after the event
    pub fn current_phase(&self, elapsed_s: f32) -> Option<&PhaseSpan> {
        if elapsed_s < 0.0 {
            return None;
        }
        self.spans
            .iter()
            .find(|s| elapsed_s >= s.start_time_s && elapsed_s < s.end_time_s())
    }

    /// Fraction [0, 1] through the active phase; `None` outside the event.
    /// Drives time-dependent visuals such as the crater reveal.
    pub fn phase_progress(&self, elapsed_s: f32) -> Option<f32> {
        self.current_phase(elapsed_s)
            .map(|s| ((elapsed_s - s.start_time_s) / s.duration_s).clamp(0.0, 1.0))
    }
}

/// Map megatons onto a [0, 1] visual intensity, log-scaled so that both
/// meteorites and extinction-class impactors land inside the range
fn energy_intensity(megatons: f64) -> f32 {
    if megatons <= 0.0 {
        return 0.0;
    }
    (((megatons.log10() + 3.0) / 9.0).clamp(0.0, 1.0)) as f32
}

//! impact-sim host driver
//!
//! Computes the full effect set for one impact scenario and, optionally, runs
//! the 18-second event timeline headless at the fixed timestep, logging phase
//! transitions and particle counts. Rendering front-ends consume the same
//! library surface this binary exercises.

use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use impact_sim::consts::SIM_DT;
use impact_sim::{
    Composition, ImpactParameters, ParticleEngine, PhaseTimeline, ProceduralBody, QualityPreset,
    SimSettings, SiteRegistry,
};

/// Deterministic asteroid impact simulation
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Impactor diameter in meters
    #[arg(short, long, default_value_t = 100.0)]
    diameter: f64,

    /// Entry velocity in km/s
    #[arg(short, long, default_value_t = 20.0)]
    velocity: f64,

    /// Impact angle in degrees from horizontal (90 = vertical)
    #[arg(short, long, default_value_t = 45.0)]
    angle: f64,

    /// Material composition: rocky, iron or icy
    #[arg(short, long, default_value = "rocky")]
    composition: String,

    /// Bulk density override in kg/m³ (defaults to the composition's
    /// reference density)
    #[arg(long)]
    density: Option<f64>,

    /// Population density around the impact point, people per km²
    #[arg(long, default_value_t = 100.0)]
    population_density: f64,

    /// Emit the full result set as JSON instead of a summary
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Run the whole event timeline headless at 60 Hz
    #[arg(long, default_value_t = false)]
    run: bool,

    /// Quality preset for the particle budget: low, medium or high
    #[arg(long, default_value = "medium")]
    quality: String,
}

/// Everything a collaborator needs to draw or narrate one impact
#[derive(Serialize)]
struct Report<'a> {
    params: &'a ImpactParameters,
    result: &'a impact_sim::ImpactResult,
    timeline: &'a PhaseTimeline,
    body: &'a ProceduralBody,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let Some(composition) = Composition::from_str(&args.composition) else {
        eprintln!("unknown composition '{}' (expected rocky, iron or icy)", args.composition);
        std::process::exit(2);
    };
    let Some(quality) = QualityPreset::from_str(&args.quality) else {
        eprintln!("unknown quality '{}' (expected low, medium or high)", args.quality);
        std::process::exit(2);
    };

    let mut params = ImpactParameters::new(args.diameter, args.velocity, args.angle, composition);
    if let Some(density) = args.density {
        params = params.with_density(density);
    }

    let mut registry = SiteRegistry::new();
    let site = match registry.launch(params, Some(args.population_density), 0.0, 0.0) {
        Ok(site) => site.clone(),
        Err(err) => {
            eprintln!("invalid parameters: {err}");
            std::process::exit(2);
        }
    };

    let result = site.result;
    let timeline = PhaseTimeline::generate(&params, result.energy_joules);
    let body = ProceduralBody::generate(&params);

    if args.json {
        let report = Report {
            params: &params,
            result: &result,
            timeline: &timeline,
            body: &body,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("failed to serialize report: {err}");
                std::process::exit(1);
            }
        }
    } else {
        print_summary(&params, &result, &body);
    }

    if args.run {
        let settings = SimSettings {
            quality,
            ..SimSettings::default()
        };
        run_headless(&params, &result, &timeline, &settings);
    }
}

fn print_summary(
    params: &ImpactParameters,
    result: &impact_sim::ImpactResult,
    body: &ProceduralBody,
) {
    println!(
        "Impactor: {:.0} m {} at {:.1} km/s, {:.0}° ({:.0} kg/m³)",
        params.diameter_m,
        params.composition.as_str(),
        params.velocity_kms,
        params.angle_deg,
        params.density_kgm3,
    );
    println!(
        "Energy:   {:.3e} J ({:.2} MT)",
        result.energy_joules, result.energy_megatons
    );
    println!(
        "Crater:   {:.0} m wide, {:.0} m deep",
        result.crater_diameter_m, result.crater_depth_m
    );
    println!(
        "Fireball: {:.1} km radius at {:.0} °C",
        result.fireball_radius_km, result.fireball_temp_c
    );
    println!(
        "Blast:    overpressure {:.1} km, shockwave {:.1} km",
        result.overpressure_radius_km, result.shockwave_radius_km
    );
    println!(
        "Seismic:  magnitude {:.1}, felt to {:.0} km",
        result.seismic_magnitude, result.seismic_radius_km
    );
    println!("Thermal:  {:.1} km radius", result.thermal_radius_km);
    println!(
        "People:   {:.0} affected, {:.0} estimated casualties",
        result.affected_population, result.casualties_estimated
    );
    println!(
        "Body:     seed {} ({:?}), {} vertices, {} craters",
        body.seed,
        body.class,
        body.vertices.len(),
        body.craters.len()
    );
}

/// Step the particle engine across the whole event at the fixed timestep
fn run_headless(
    params: &ImpactParameters,
    result: &impact_sim::ImpactResult,
    timeline: &PhaseTimeline,
    settings: &SimSettings,
) {
    let mut engine = ParticleEngine::new(params, result, settings.particle_budget())
        .with_burst_scale(settings.burst_scale());
    let total = timeline.total_duration_s();
    let mut elapsed = 0.0_f32;
    let mut last_phase = None;
    let mut peak = 0usize;

    while elapsed < total {
        let phase = timeline.current_phase(elapsed).map(|s| s.phase);
        if phase != last_phase {
            if let Some(p) = phase {
                log::info!("t={elapsed:.2}s entering phase '{}'", p.as_str());
            }
            last_phase = phase;
        }
        let live = engine.step(timeline, elapsed, SIM_DT, Vec2::ZERO);
        peak = peak.max(live.len());
        elapsed += SIM_DT;
    }

    // Let the tail of the particle population expire
    while !engine.is_empty() {
        engine.step(timeline, elapsed, SIM_DT, Vec2::ZERO);
        elapsed += SIM_DT;
    }

    println!(
        "Ran {:.0} s of simulation at {} Hz; peak live particles {} (budget {})",
        elapsed,
        (1.0 / SIM_DT).round(),
        peak,
        settings.particle_budget()
    );
}

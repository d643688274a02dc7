use std::path::Path;
use std::time::{Duration, Instant};

use crate::cli::scenario::{ScriptedHost, load_scenario};
use crate::config::catalog::Catalog;
use crate::config::loader::{EngineSettings, load_engine_config};
use crate::orchestrator::engine::ContextOrchestrator;
use crate::orchestrator::presenter::{PresenterCall, RecordingPresenter};

// ============================================================================
// check subcommand
// ============================================================================

/// Load and validate a configuration. Returns whether it is free of issues.
pub fn cmd_check(config_path: &str, verbose: u8) -> Result<bool, Box<dyn std::error::Error>> {
    let config = load_engine_config(Path::new(config_path))?;
    let catalog = Catalog::from_config(config);

    let stage_count: usize = catalog
        .flows()
        .iter()
        .flat_map(|f| f.pages.iter())
        .map(|p| p.stages.len())
        .sum();

    println!(
        "{}: {} identifiers, {} discoveries, {} flows, {} stages",
        config_path,
        catalog.identifiers().len(),
        catalog.discoveries().len(),
        catalog.flows().len(),
        stage_count
    );

    if verbose > 0 {
        for flow in catalog.flows() {
            println!("  flow {} ({} pages)", flow.id, flow.pages.len());
        }
    }

    if catalog.issues().is_empty() {
        println!("No issues found.");
        return Ok(true);
    }

    println!("{} issue(s):", catalog.issues().len());
    for issue in catalog.issues() {
        println!("  - {}", issue.describe());
    }
    Ok(false)
}

// ============================================================================
// replay subcommand
// ============================================================================

pub fn cmd_replay(
    config_path: &str,
    scenario_path: &str,
    settings: &EngineSettings,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::from_config(load_engine_config(Path::new(config_path))?);
    let scenario = load_scenario(scenario_path)?;

    let mut engine = ContextOrchestrator::new(catalog, RecordingPresenter::new(), settings);
    let mut host = ScriptedHost::default();

    let start = Instant::now();
    engine.start(start);

    for (i, step) in scenario.steps.iter().enumerate() {
        host.apply(step);

        let offset = step
            .at_ms
            .unwrap_or(settings.poll_interval_ms * (i as u64 + 1));
        let now = start + Duration::from_millis(offset);

        let views = host.surfaces.clone();
        let ran = engine.poll(now, &views, &mut host);
        if verbose > 0 {
            println!(
                "[step {}] t={}ms mode={:?} ticked={} flows={:?}",
                i,
                offset,
                engine.mode(),
                ran,
                engine.flow_stack().ids()
            );
        }
        print_calls(i, engine.presenter_mut().drain());

        for event in &step.events {
            println!("[step {}] <- {:?}", i, event);
            engine.dispatch(event.clone());
        }
        print_calls(i, engine.presenter_mut().drain());
    }

    println!("Replay finished in {:?} mode.", engine.mode());
    Ok(())
}

fn print_calls(step: usize, calls: Vec<PresenterCall>) {
    for call in calls {
        println!("[step {}] -> {}", step, format_call(&call));
    }
}

pub fn format_call(call: &PresenterCall) -> String {
    match call {
        PresenterCall::Pointer { stage_id, target } => match target {
            Some(t) => format!("present_pointer({}, {:?})", stage_id, t.rect()),
            None => format!("present_pointer({})", stage_id),
        },
        PresenterCall::UpdatePointer { rect, surface } => match surface {
            Some(s) => format!("update_pointer({:?}, {})", rect, s.surface_id),
            None => format!("update_pointer({:?})", rect),
        },
        PresenterCall::FlowSelector { title, options } => {
            format!("present_flow_selector({:?}, {:?})", title, options)
        }
        PresenterCall::DiscoveryPrompt {
            header,
            opt_in,
            opt_out,
            languages,
            presentation,
        } => format!(
            "present_discovery_prompt({:?}, {:?}, {:?}, {:?}, {:?})",
            header, opt_in, opt_out, languages, presentation
        ),
        PresenterCall::MainButton => "present_main_button()".to_string(),
        PresenterCall::RemoveAll => "remove_all()".to_string(),
    }
}

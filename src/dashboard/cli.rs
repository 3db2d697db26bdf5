use std::io::{self, stdin, stdout, Write};

use crate::control_system::signal_optimizer::optimize_timings;
use crate::dashboard::session::TrafficLightsSession;
use crate::models::camera::CameraFeed;
use crate::models::intersection::{Intersection, IntersectionStatus, PhaseField};
use crate::models::violation::{ViolationStatus, ViolationType};
use crate::monitoring::violations::ViolationQuery;

// End of input surfaces as `UnexpectedEof` so the menu can stop.
fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    stdout().flush()?;
    let mut input = String::new();
    if stdin().read_line(&mut input)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(input.trim().to_string())
}

fn print_intersection(intersection: &Intersection) {
    let active = intersection
        .active_phase()
        .map(|p| p.name.as_str())
        .unwrap_or("-");
    let next = intersection
        .next_phase()
        .map(|p| p.name.as_str())
        .unwrap_or("-");
    println!(
        "{} | {} | {} | cycle {}s | now: {} | next: {} | {} vehicles, {:.1}s wait",
        intersection.id,
        intersection.name,
        intersection.status,
        intersection.cycle_time(),
        active,
        next,
        intersection.vehicle_count,
        intersection.avg_wait_time
    );
    for phase in &intersection.phases {
        println!(
            "    {} {:<24} {:>4}s {}{}",
            phase.id,
            phase.name,
            phase.duration,
            phase.color,
            if phase.active { " (active)" } else { "" }
        );
    }
}

fn print_list(session: &TrafficLightsSession, intersections: &[Intersection]) {
    if let Some(error) = session.error() {
        println!("{}", error);
    }
    if intersections.is_empty() {
        println!("No intersections.");
    }
    for intersection in intersections {
        print_intersection(intersection);
    }
}

fn edit_intersection(session: &mut TrafficLightsSession) -> io::Result<()> {
    let id = prompt("Enter intersection ID to edit: ")?;
    match session.open_draft(&id) {
        Ok(draft) => print_intersection(draft.intersection()),
        Err(e) => {
            eprintln!("{}", e);
            return Ok(());
        }
    }

    loop {
        println!("\nEditing {}", id);
        println!("1. Set phase duration");
        println!("2. Set status");
        println!("3. Activate phase");
        println!("4. Save");
        println!("5. Cancel");
        let choice = prompt("Enter your choice: ")?.parse::<u32>().unwrap_or(0);
        let outcome = match choice {
            1 => {
                let phase_id = prompt("Phase ID: ")?;
                match prompt("New duration (seconds): ")?.parse::<u32>() {
                    Ok(duration) => session.set_phase_field(&phase_id, PhaseField::Duration(duration)),
                    Err(_) => {
                        println!("Not a number.");
                        Ok(())
                    }
                }
            }
            2 => match prompt("Status (active/inactive/maintenance): ")?.parse::<IntersectionStatus>() {
                Ok(status) => session.set_status(status),
                Err(e) => {
                    println!("{}", e);
                    Ok(())
                }
            },
            3 => {
                let phase_id = prompt("Phase ID: ")?;
                session.activate_phase(&phase_id)
            }
            4 => {
                match session.commit() {
                    Ok(committed) => print_intersection(&committed),
                    Err(e) => eprintln!("Error saving intersection: {}", e),
                }
                return Ok(());
            }
            5 => {
                session.cancel_draft();
                return Ok(());
            }
            _ => {
                println!("Invalid choice. Try again.");
                Ok(())
            }
        };
        match outcome {
            Ok(()) => {
                if let Some(draft) = session.draft() {
                    print_intersection(draft.intersection());
                }
            }
            Err(e) => eprintln!("{}", e),
        }
    }
}

async fn show_violations(session: &TrafficLightsSession, rows_per_page: usize) -> io::Result<()> {
    let search_term = prompt("Search plate or location (blank for all): ")?;
    let type_input = prompt("Type (blank for all): ")?;
    let status_input = prompt("Status (blank for all): ")?;
    let camera_input = prompt("Camera ID (blank for all): ")?;
    let start_time = prompt("From unix time (blank for no bound): ")?.parse::<u64>().ok();
    let end_time = prompt("Until unix time (blank for no bound): ")?.parse::<u64>().ok();
    let page = prompt("Page (from 1): ")?.parse::<usize>().unwrap_or(1).max(1) - 1;

    let query = ViolationQuery {
        page,
        rows_per_page,
        search_term,
        violation_type: type_input.parse::<ViolationType>().ok(),
        status: status_input.parse::<ViolationStatus>().ok(),
        camera_id: Some(camera_input).filter(|c| !c.is_empty()),
        start_time,
        end_time,
    };
    match session.source().fetch_violations_page(&query).await {
        Ok(result) => {
            println!(
                "Violations (page {}, {} matching):",
                result.page + 1,
                result.total_count
            );
            for v in result.violations {
                println!(
                    "{} | {} | {} | {} | {} | {} | {:.0}% | {}",
                    v.id,
                    v.violation_type,
                    v.license_plate.as_deref().unwrap_or("unknown"),
                    v.location,
                    v.camera_id,
                    v.timestamp,
                    v.confidence * 100.0,
                    v.status
                );
            }
        }
        Err(e) => eprintln!("Error loading violations: {}", e),
    }
    Ok(())
}

async fn show_summary(session: &TrafficLightsSession) {
    match session.source().fetch_traffic_summary().await {
        Ok(summary) => {
            println!("Traffic summary (last {}h):", summary.window_hours);
            println!("Vehicles tracked: {}", summary.total_vehicles);
            println!("Average wait: {:.1}s", summary.average_wait_time);
            for (status, count) in &summary.intersections_by_status {
                println!("Intersections {}: {}", status, count);
            }
            println!("Violations: {}", summary.total_violations);
            for (kind, count) in &summary.violation_counts {
                println!("  {}: {}", kind, count);
            }
        }
        Err(e) => eprintln!("Error loading traffic summary: {}", e),
    }
}

fn print_camera(camera: &CameraFeed) {
    println!(
        "{} | {} | {} | {} | last active: {} | {}",
        camera.id,
        camera.name,
        camera.location,
        camera.status,
        camera
            .last_active
            .map_or_else(|| "never".to_string(), |ts| ts.to_string()),
        camera.stream_url.as_deref().unwrap_or("-")
    );
}

async fn show_cameras(session: &TrafficLightsSession) -> io::Result<()> {
    let id = prompt("Camera ID (blank for all): ")?;
    let source = session.source();
    if id.is_empty() {
        match source.fetch_cameras().await {
            Ok(cameras) if cameras.is_empty() => println!("No cameras."),
            Ok(cameras) => cameras.iter().for_each(print_camera),
            Err(e) => eprintln!("Error loading cameras: {}", e),
        }
    } else {
        match source.fetch_camera(&id).await {
            Ok(camera) => print_camera(&camera),
            Err(e) => eprintln!("{}", e),
        }
    }
    Ok(())
}

async fn show_system_status(session: &TrafficLightsSession) {
    match session.source().fetch_system_status().await {
        Ok(status) => {
            println!("System: {}", status.status);
            println!(
                "Cameras online: {}/{}",
                status.cameras_online,
                status.cameras.len()
            );
            println!("Violations today: {}", status.violations_today);
            println!("Uptime: {}s", status.uptime_secs);
        }
        Err(e) => eprintln!("Error loading system status: {}", e),
    }
}

fn show_recommendations(session: &TrafficLightsSession) {
    for rec in optimize_timings(&session.intersections()) {
        println!(
            "{}: {} for {}s ({})",
            rec.intersection_id, rec.color, rec.duration, rec.reason
        );
    }
}

/// Interactive admin menu over one traffic lights session. Returns when the
/// operator exits or stdin closes.
pub async fn run_cli(session: &mut TrafficLightsSession, rows_per_page: usize) -> io::Result<()> {
    loop {
        println!("\nTraffic Lights Admin CLI");
        println!("1. List intersections");
        println!("2. Search intersections");
        println!("3. Edit intersection");
        println!("4. Show violations");
        println!("5. Show traffic summary");
        println!("6. Recommend signal timings");
        println!("7. Show cameras");
        println!("8. Show system status");
        println!(
            "9. Toggle auto refresh (currently {})",
            if session.is_auto_refreshing() { "on" } else { "off" }
        );
        println!("10. Reload now");
        println!("11. Exit");
        let input = match prompt("Enter your choice: ") {
            Ok(input) => input,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        };
        match input.parse::<u32>().unwrap_or(0) {
            1 => print_list(session, &session.intersections()),
            2 => {
                let search = prompt("Search name or ID: ")?;
                print_list(session, &session.filtered(&search));
            }
            3 => edit_intersection(session)?,
            4 => show_violations(session, rows_per_page).await?,
            5 => show_summary(session).await,
            6 => show_recommendations(session),
            7 => show_cameras(session).await?,
            8 => show_system_status(session).await,
            9 => {
                let enabled = !session.is_auto_refreshing();
                session.set_auto_refresh(enabled);
                println!("Auto refresh {}", if enabled { "enabled" } else { "disabled" });
            }
            10 => {
                if let Err(e) = session.load().await {
                    eprintln!("{}", e);
                }
            }
            11 => {
                println!("Exiting CLI.");
                break;
            }
            _ => println!("Invalid choice. Try again."),
        }
    }
    Ok(())
}

//src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::io;
use std::io::stdout;

use mapty_lib::{
    logging, AppError, AppService, ConfiguredGeolocation, FormField, Workout, WorkoutType,
};

fn main() -> Result<()> {
    let cli_args = cli::parse_args();
    let export_csv = cli_args.export_csv;
    logging::init_cli_logging(cli_args.verbose, cli_args.quiet);

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    // Loads config and opens the workout store
    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Add { workout } => {
            start_service(&mut service)?;
            let created = add_workout(&mut service, workout)?;
            println!(
                "Logged {} {} (ID: {})",
                created.workout_type().icon(),
                created.description(),
                created.id()
            );
            let (value, unit) = created.derived_metric();
            println!("  {:.1} {unit}", value);
        }
        cli::Commands::List { limit } => {
            // A missing position only matters for the map, the list loads regardless.
            let geolocation = ConfiguredGeolocation::new(service.config.home_location);
            if let Err(e) = service.start(&geolocation) {
                tracing::info!(error = %e, "Listing without a map");
            }
            let workouts: Vec<&Workout> = service
                .workouts_newest_first()
                .take(limit.unwrap_or(usize::MAX))
                .collect();
            if workouts.is_empty() {
                println!("No workouts logged yet.");
            } else if export_csv {
                print_workout_csv(&workouts)?;
            } else {
                let header_color = mapty_lib::parse_color(&service.config.theme.header_color)
                    .map(Color::from)
                    .unwrap_or(Color::Green); // Fallback
                print_workout_table(&workouts, header_color);
            }
        }
        cli::Commands::Show { id } => {
            // Details load without a position; only the map line needs one.
            let geolocation = ConfiguredGeolocation::new(service.config.home_location);
            if let Err(e) = service.start(&geolocation) {
                tracing::info!(error = %e, "Showing workout without a map");
            }
            if service.move_to_workout(Some(&id)) {
                // Jump straight to the end of the pan.
                service.tick(std::time::Instant::now() + std::time::Duration::from_secs(3600));
            }
            let Some(workout) = service.find_workout(&id) else {
                bail!("Workout with ID '{}' not found.", id);
            };
            print_workout_details(workout);
            if let Some(map) = service.map() {
                println!("Map centred on {} at zoom {}", map.center(), map.zoom());
            }
        }
        cli::Commands::SetHome { location } => {
            service
                .set_home_location(location)
                .context("Failed to set home location")?;
            println!("Home location set to {location}.");
            println!("Config saved to: {:?}", service.get_config_path());
        }
        cli::Commands::SetZoom { level } => {
            service
                .set_zoom_level(level)
                .context("Failed to set zoom level")?;
            println!("Zoom level set to {level}.");
            println!("Config saved to: {:?}", service.get_config_path());
        }
        cli::Commands::DbPath => {
            println!("Database file is located at: {:?}", service.get_db_path());
        }
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
    }

    Ok(())
}

fn start_service(service: &mut AppService) -> Result<()> {
    let geolocation = ConfiguredGeolocation::new(service.config.home_location);
    match service.start(&geolocation) {
        Ok(()) => Ok(()),
        Err(AppError::LocationUnavailable(reason)) => {
            bail!("Error Getting Location: {reason}. Try `mapty set-home <lat,lng>`.")
        }
        Err(e) => Err(e.into()),
    }
}

/// Runs the same steps as the map: click, fill the form, submit.
fn add_workout(service: &mut AppService, command: cli::WorkoutCommand) -> Result<Workout> {
    let (workout_type, lat, lng, distance, duration, (third_field, third)) = match command {
        cli::WorkoutCommand::Running {
            lat,
            lng,
            distance,
            duration,
            cadence,
        } => (
            WorkoutType::Running,
            lat,
            lng,
            distance,
            duration,
            (FormField::Cadence, cadence),
        ),
        cli::WorkoutCommand::Cycling {
            lat,
            lng,
            distance,
            duration,
            elevation,
        } => (
            WorkoutType::Cycling,
            lat,
            lng,
            distance,
            duration,
            (FormField::Elevation, elevation),
        ),
    };
    let coords = mapty_lib::Coords::checked(lat, lng)?;
    service.click_map(coords)?;

    let form = service.form_mut();
    form.set_type(workout_type);
    form.set_input(FormField::Distance, &distance);
    form.set_input(FormField::Duration, &duration);
    form.set_input(third_field, &third);

    let submitted = service.submit_workout(Utc::now()).map(Workout::clone);
    match submitted {
        Ok(workout) => Ok(workout),
        Err(AppError::InvalidInput(e)) => {
            let fields: Vec<&str> = service
                .form()
                .invalid_fields()
                .iter()
                .map(|f| f.label())
                .collect();
            bail!("{e} (check: {})", fields.join(", "))
        }
        Err(e) => Err(e).context("Failed to add workout"),
    }
}

fn print_workout_details(workout: &Workout) {
    let (metric, metric_unit) = workout.derived_metric();
    let (extra, extra_unit) = workout.type_metric();
    println!("{} {}", workout.workout_type().icon(), workout.description());
    println!("  ID:       {}", workout.id());
    println!(
        "  Logged:   {}",
        workout.date().with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    println!("  Location: {}", workout.coords());
    println!("  Distance: {} km", workout.distance());
    println!("  Duration: {} min", workout.duration());
    println!("  {:<9} {:.1} {metric_unit}", label_for(metric_unit), metric);
    println!("  {:<9} {extra} {extra_unit}", label_for(extra_unit));
}

fn label_for(unit: &str) -> &'static str {
    match unit {
        "min/km" => "Pace:",
        "km/h" => "Speed:",
        "spm" => "Cadence:",
        _ => "Elevation:",
    }
}

fn print_workout_table(workouts: &[&Workout], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Date (Local)").fg(header_color),
            Cell::new("Workout").fg(header_color),
            Cell::new("Location").fg(header_color),
            Cell::new("Distance (km)").fg(header_color),
            Cell::new("Duration (min)").fg(header_color),
            Cell::new("Pace / Speed").fg(header_color),
            Cell::new("Cadence / Elev").fg(header_color),
        ]);

    for workout in workouts {
        let (metric, metric_unit) = workout.derived_metric();
        let (extra, extra_unit) = workout.type_metric();
        table.add_row(vec![
            Cell::new(workout.id()),
            Cell::new(
                workout
                    .date()
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            ),
            Cell::new(format!(
                "{} {}",
                workout.workout_type().icon(),
                workout.description()
            )),
            Cell::new(workout.coords().to_string()),
            Cell::new(workout.distance().to_string()),
            Cell::new(workout.duration().to_string()),
            Cell::new(format!("{metric:.1} {metric_unit}")),
            Cell::new(format!("{extra} {extra_unit}")),
        ]);
    }
    println!("{table}");
}

fn print_workout_csv(workouts: &[&Workout]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record([
        "ID",
        "Date_Local",
        "Type",
        "Latitude",
        "Longitude",
        "Distance_km",
        "Duration_min",
        "Pace_min_per_km",
        "Speed_km_per_h",
        "Cadence_spm",
        "Elevation_gain_m",
        "Description",
    ])?;

    for workout in workouts {
        let coords = workout.coords();
        let (extra, _) = workout.type_metric();
        let (cadence, elevation) = match workout.workout_type() {
            WorkoutType::Running => (extra.to_string(), String::new()),
            WorkoutType::Cycling => (String::new(), extra.to_string()),
        };
        writer.write_record([
            workout.id().to_string(),
            workout.date().with_timezone(&Local).to_rfc3339(),
            workout.workout_type().to_string(),
            coords.lat.to_string(),
            coords.lng.to_string(),
            workout.distance().to_string(),
            workout.duration().to_string(),
            workout.pace().map(|v| format!("{v:.2}")).unwrap_or_default(),
            workout.speed().map(|v| format!("{v:.2}")).unwrap_or_default(),
            cadence,
            elevation,
            workout.description().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

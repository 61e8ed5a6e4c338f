//! Plain-text schedule summary
//!
//! Pure formatting over a [`Schedule`]: a header block, one block per
//! vehicle, one line per destination, and a vehicle-count footer. This is
//! the consumer contract that pins the Schedule shape — field names and
//! ordering here must stay stable.

use fleetsync_core::{DateKey, Schedule};

/// Render a day key for display (`"2024-08-01"` → `"01/08/2024"`).
/// Falls back to the raw key if it ever fails to parse.
pub fn display_date(date: &DateKey) -> String {
    match date.to_date() {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => date.as_str().to_string(),
    }
}

/// Compose the shareable text summary of a schedule.
///
/// A schedule with no vehicles yields an empty string (there is nothing
/// worth sending).
pub fn compose_schedule_message(schedule: &Schedule) -> String {
    if schedule.vehicles.is_empty() {
        return String::new();
    }

    let mut message = String::new();
    message.push_str(&format!("*{}*\n", schedule.name));
    message.push_str(&format!("Date: {}\n\n", display_date(&schedule.date)));

    for (index, vehicle) in schedule.vehicles.iter().enumerate() {
        message.push_str(&format!("Vehicle {}:\n", index + 1));
        message.push_str(&format!("  *Plate: {}*\n", vehicle.plate));
        message.push_str(&format!("  Driver: {}\n", vehicle.driver));
        message.push_str(&format!("  Origin: {}\n", vehicle.origin));

        for (dest_index, destination) in vehicle.destinations.iter().enumerate() {
            message.push_str(&format!(
                "  Destination {}: {}\n",
                dest_index + 1,
                destination.name
            ));
            if let Some(time) = &destination.time {
                if !time.is_empty() {
                    message.push_str(&format!("  Time: {time}\n"));
                }
            }
            if let Some(observation) = &destination.observation {
                if !observation.is_empty() {
                    message.push_str(&format!("  Note: {observation}\n"));
                }
            }
        }
        message.push('\n');
    }

    message.push_str(&format!("Total vehicles: {}", schedule.vehicles.len()));
    message
}

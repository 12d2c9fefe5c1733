use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::format::{format_date_time, format_relative_time};
use crate::models::baggage::{Baggage, BaggageStatus, Paginated, StatusUpdate};
use crate::models::dashboard::DashboardStats;
use crate::models::user::User;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", sonic_rs::to_string_pretty(value)?);
    Ok(())
}

pub fn print_user(user: &User) {
    println!("{} [{}]", user.display_name(), user.initials());
    println!("  username:   {}", user.username);
    println!("  email:      {}", user.email);
    println!("  role:       {}", user.role);
    if let Some(employee_id) = &user.employee_id {
        println!("  employee:   {}", employee_id);
    }
    if let Some(department) = &user.department {
        println!("  department: {}", department);
    }
    println!(
        "  can update baggage status: {}",
        if user.can_update_status() { "yes" } else { "no" }
    );
}

pub fn print_baggage(bag: &Baggage, now: DateTime<Utc>) {
    println!("{}  {}", bag.qr_code, bag.current_status.display_name());
    println!("  id:          {}", bag.id);
    println!("  passenger:   {}", bag.passenger_name);
    if let Some(flight) = &bag.flight_number {
        println!("  flight:      {}", flight);
    }
    if let Some(destination) = &bag.destination {
        println!("  destination: {}", destination);
    }
    println!("  updated:     {}", format_relative_time(bag.updated_at, now));
    print_timeline(bag.timeline_most_recent_first(), now);
}

pub fn print_timeline(updates: Vec<&StatusUpdate>, now: DateTime<Utc>) {
    if updates.is_empty() {
        println!("  no status updates yet");
        return;
    }

    for update in updates {
        let mut line = format!(
            "  {:<16} {:<18} {}",
            update.status.display_name(),
            format_date_time(update.timestamp),
            format_relative_time(update.timestamp, now)
        );
        if let Some(location) = update.location.as_deref().filter(|l| !l.is_empty()) {
            line.push_str(&format!("  @ {}", location));
        }
        if let Some(by) = &update.updated_by_name {
            line.push_str(&format!("  by {}", by));
        }
        println!("{}", line);
        if let Some(notes) = update.notes.as_deref().filter(|n| !n.is_empty()) {
            println!("      {}", notes);
        }
    }
}

pub fn print_baggage_list(page: &Paginated<Baggage>) {
    for bag in &page.results {
        println!(
            "{:<14} {:<18} {:<24} {}",
            bag.qr_code,
            bag.current_status.display_name(),
            bag.passenger_name,
            bag.flight_number.as_deref().unwrap_or("-")
        );
    }
    println!("{} of {} bags", page.results.len(), page.count);
}

pub fn print_stats(stats: &DashboardStats, now: DateTime<Utc>) {
    println!("Total baggage: {}", stats.total_baggage);
    for status in BaggageStatus::ALL {
        println!("  {:<18} {}", status.display_name(), stats.count_for(status));
    }
    if !stats.recent_updates.is_empty() {
        println!("Recent updates:");
        print_timeline(stats.recent_updates.iter().collect(), now);
    }
}

//! Status text for the host's debug display.

use std::fmt::Write as _;

use tars_assess::weapon::Weapon;

use crate::report::{TickReport, TickStatus};
use crate::systems::defcon::OverrideReason;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Render the status panel for one tick.
pub fn render(report: &TickReport, weapons: &[Box<dyn Weapon>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, ">>>> {} <<<<", report.condition);
    let _ = writeln!(out);

    match report.status {
        TickStatus::Degraded => {
            let _ = writeln!(out, "Threat detection unavailable, retrying activation...");
        }
        TickStatus::Abandoned => {
            let _ = writeln!(out, "Threat scan failed, results discarded.");
        }
        TickStatus::Assessed => {}
    }

    if weapons.is_empty() {
        let _ = writeln!(out, "Error: No turrets registered.");
    }

    let spinner = SPINNER[(report.tick % SPINNER.len() as u64) as usize];
    let _ = writeln!(out, "Searching for Threats... {spinner}");

    match report.override_reason {
        Some(OverrideReason::CapacityLoss { was, now }) => {
            let _ = writeln!(out, "Shield is taking damage! (was {was} is now {now})");
        }
        Some(OverrideReason::HullDamage { delta }) => {
            let _ = writeln!(out, "Grid is taking damage! (+{delta:.1})");
        }
        None => {}
    }

    let _ = writeln!(out, "Active Threat Level: >>> {:.3} <<<", report.aggregate);

    if report.contacts.is_empty() {
        let _ = write!(out, "\n\n  ==  No Viable Threats Detected.  ==  \n\n");
    } else {
        for threat in &report.contacts {
            out.push_str(&threat.detail_report(weapons));
            out.push('\n');
        }
    }
    out
}

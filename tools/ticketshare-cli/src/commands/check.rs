//! Check export and share capabilities.

use ticketshare_common::config::AppConfig;
use ticketshare_compositor::text::FontTextPainter;
use ticketshare_share::capabilities::{check_capabilities, print_capability_report, Capability};

fn check_font(config: &AppConfig) -> Capability {
    let found = FontTextPainter::discover(config.text.font_path.as_deref());
    Capability {
        name: "Caption Font".to_string(),
        description: match &found {
            Ok(painter) => format!("Band caption uses {}", painter.source().display()),
            Err(_) => "TrueType font for the name band caption".to_string(),
        },
        available: found.is_ok(),
        required: false,
        fix_instructions: found.err().map(|e| {
            format!("Set text.font_path in the config to a .ttf file ({e})")
        }),
    }
}

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("TicketShare System Check");
    println!("{}", "=".repeat(50));

    let mut capabilities = vec![check_font(config)];
    capabilities.extend(check_capabilities(config));
    println!();
    print_capability_report(&capabilities);

    let all_required_ok = capabilities
        .iter()
        .filter(|c| c.required)
        .all(|c| c.available);

    println!();
    if all_required_ok {
        println!("All required capabilities are available. TicketShare is ready.");
    } else {
        println!("Some required capabilities are missing. See above for fixes.");
    }

    Ok(())
}

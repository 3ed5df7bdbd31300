/// Example program to print the loaded configuration
///
/// Run with: cargo run -p glide-config --example print_config

fn main() {
    // Load configuration from glide.toml
    let config = glide_config::GlideConfig::load();

    println!("=== Glide Configuration ===\n");

    println!("Transition Settings:");
    println!("  Duration: {}ms", config.transition.duration_ms);
    println!("  Easing: {}", config.transition.easing);
    println!();

    println!("Ticker Settings:");
    println!("  Frame Rate: {}", config.ticker.frame_rate);
    println!("  Frame Interval: {:.3}ms", config.ticker.frame_interval_ms());
    println!("  Max Frames: {}", config.ticker.max_frames);
    println!();

    println!("Demo Settings:");
    println!("  From: {} -> To: {}", config.demo.from, config.demo.to);
    println!(
        "  Colors: {} -> {}",
        config.demo.from_color, config.demo.to_color
    );
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}

/// Example program to print the loaded configuration
///
/// Run with: cargo run -p keyframe-config --example print_config

fn main() {
    let config = keyframe_config::KeyframeConfig::load();

    println!("=== Keyframe Engine Configuration ===\n");

    println!("Player Settings:");
    println!("  Strict Fill: {}", config.player.strict_fill);
    println!("  Default Easing: {}", config.player.default_easing);
    println!();

    println!("Logging Settings:");
    println!("  Level: {}", config.logging.level);
    println!();

    println!("Property Tables:");
    println!("  Dimensional: {}", config.properties.dimensional.join(", "));
    println!("  Rounded Numeric: {}", config.properties.rounded_numeric.join(", "));
    println!("  Numeric: {}", config.properties.numeric.join(", "));
    println!("  Transform: {}", config.properties.transform.join(", "));
    println!("  Color: {}", config.properties.color.join(", "));
}

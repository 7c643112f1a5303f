use std::fs;

fn main() {
    // Bundled themes are embedded with include_str!, so reject broken TOML at compile time
    for theme_path in ["themes/light.toml", "themes/dark.toml"] {
        println!("cargo:rerun-if-changed={}", theme_path);

        let content = fs::read_to_string(theme_path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", theme_path, e));

        if let Err(e) = content.parse::<toml::Table>() {
            panic!("Invalid {}: {}", theme_path, e);
        }
    }
}

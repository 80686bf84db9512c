//! CLI subcommands.

pub mod edit;
pub mod export;
pub mod inspect;
pub mod ocr;
pub mod photo;

use std::path::Path;

use console::style;

use inkedit_core::{InkeditConfig, Point, Rgb, TextRegion};

/// Load the config file when one was given, defaults otherwise.
pub fn load_config(path: Option<&str>) -> anyhow::Result<InkeditConfig> {
    match path {
        Some(path) => Ok(InkeditConfig::from_file(Path::new(path))?),
        None => Ok(InkeditConfig::default()),
    }
}

/// Parse an `X,Y` pair.
pub fn parse_point(input: &str) -> anyhow::Result<Point> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        anyhow::bail!("expected a point as X,Y, got {input:?}");
    }
    let x: f32 = parts[0]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid X coordinate {:?}", parts[0]))?;
    let y: f32 = parts[1]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid Y coordinate {:?}", parts[1]))?;
    Ok(Point::new(x, y))
}

/// Parse an `RRGGBB` hex color, with or without a leading `#`.
pub fn parse_hex_color(input: &str) -> anyhow::Result<Rgb> {
    let hex = input.strip_prefix('#').unwrap_or(input);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        anyhow::bail!("expected a color as RRGGBB, got {input:?}");
    }
    let channel = |range| u8::from_str_radix(&hex[range], 16);
    Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Print a region listing in the shared text format.
pub fn print_regions(regions: &[TextRegion]) {
    for region in regions {
        let confidence = match region.confidence {
            Some(conf) => format!(" {:5.1}%", conf),
            None => String::new(),
        };
        println!(
            "{:>6}  ({:7.1}, {:7.1})  {:6.1} x {:5.1}  {:<24} {:5.1}pt{}  {:?}",
            style(region.id.0).cyan(),
            region.bounds.x,
            region.bounds.y,
            region.bounds.width,
            region.bounds.height,
            region.font.family,
            region.font.size,
            confidence,
            region.text,
        );
    }
    println!(
        "{} {} region(s)",
        style("found").green(),
        style(regions.len()).bold()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        let point = parse_point("110, 105.5").unwrap();
        assert_eq!(point.x, 110.0);
        assert_eq!(point.y, 105.5);
        assert!(parse_point("110").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("ff8000").unwrap(), Rgb(255, 128, 0));
        assert_eq!(parse_hex_color("#000000").unwrap(), Rgb(0, 0, 0));
        assert!(parse_hex_color("zzz").is_err());
        assert!(parse_hex_color("ffff").is_err());
    }
}

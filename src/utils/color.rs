// 64-bit FNV-1a parameters
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

// Convert HSL to RGB
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let h = h.rem_euclid(1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 1.0 / 6.0 {
        (c, x, 0.0)
    } else if h < 2.0 / 6.0 {
        (x, c, 0.0)
    } else if h < 3.0 / 6.0 {
        (0.0, c, x)
    } else if h < 4.0 / 6.0 {
        (0.0, x, c)
    } else if h < 5.0 / 6.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET_BASIS, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

/// Hue in `[0, 1)` for an asset identifier. Fixed FNV-1a over the UTF-8
/// bytes, so the same name gets the same colour across builds and platforms.
pub fn tag_hue(tag: &str) -> f32 {
    (fnv1a(tag.as_bytes()) % 360) as f32 / 360.0
}

/// RGB colour standing in for an image until textures are loaded.
pub fn tag_color(tag: &str, lightness: f32) -> [f32; 3] {
    let (r, g, b) = hsl_to_rgb(tag_hue(tag), 0.7, lightness);
    [r, g, b]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32, f32), b: (f32, f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5 && (a.2 - b.2).abs() < 1e-5
    }

    #[test]
    fn test_primary_hues() {
        assert!(close(hsl_to_rgb(0.0, 1.0, 0.5), (1.0, 0.0, 0.0)));
        assert!(close(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), (0.0, 1.0, 0.0)));
        assert!(close(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), (0.0, 0.0, 1.0)));
        assert!(close(hsl_to_rgb(0.25, 0.0, 0.3), (0.3, 0.3, 0.3)));
    }

    #[test]
    fn test_tag_color_is_stable() {
        assert_eq!(tag_color("nebula.png", 0.6), tag_color("nebula.png", 0.6));
        let hue = tag_hue("aurora.jpg");
        assert!((0.0..1.0).contains(&hue));
    }

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv1a(b"foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn test_tag_hue_is_fixed() {
        let expected = (0xaf63_dc4c_8601_ec8c_u64 % 360) as f32 / 360.0;
        assert_eq!(tag_hue("a"), expected);
        assert_eq!(tag_hue(""), (0xcbf2_9ce4_8422_2325_u64 % 360) as f32 / 360.0);
    }
}

/// Split a packed `0xRRGGBB` value into sRGB components in [0, 1]
pub fn hex_to_srgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// sRGB transfer function inverse for a single channel
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Packed sRGB hex colour to linear RGB, which is what the shaders light with
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    let [r, g, b] = hex_to_srgb(hex);
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)]
}

/// Scale a linear colour by an intensity, padding to a vec4 for uniforms
pub fn scaled_rgba(color: [f32; 3], intensity: f32) -> [f32; 4] {
    [
        color[0] * intensity,
        color[1] * intensity,
        color[2] * intensity,
        intensity,
    ]
}

use palette::Srgba;

/// Dimmed copy of a border palette, used while the tray is loading.
///
/// The first color gets an opacity of `1/N` for `N` colors, every later
/// color at index `i` gets `1/i`. The existing alpha is replaced, not
/// multiplied.
pub fn faded_colors(colors: &[Srgba<f64>]) -> Vec<Srgba<f64>> {
    let count = colors.len() as f64;
    colors
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let opacity = if i == 0 { 1.0 / count } else { 1.0 / i as f64 };
            let (r, g, b, _) = color.into_components();
            Srgba::new(r, g, b, opacity)
        })
        .collect()
}

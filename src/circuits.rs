//! Static circuit-name to display-slug table. This is configuration data,
//! not logic: new or renamed circuits degrade to an empty slug until the
//! table is extended.

static CIRCUIT_SLUGS: &[(&str, &str)] = &[
    ("circuito de jerez - angel nieto", "jerez"),
    ("circuit de barcelona-catalunya", "catalunya"),
    ("circuit ricardo tormo", "valencia"),
    ("circuit bugatti", "lemans"),
    ("autodromo internazionale del mugello", "mugello"),
    ("tt circuit assen", "assen"),
    ("sachsenring", "sachsenring"),
    ("lusail international circuit", "lusail"),
    ("circuit of the americas", "cota"),
    ("red bull ring - spielberg", "redbullring"),
    ("misano world circuit marco simoncelli", "misano"),
    ("mobility resort motegi", "motegi"),
    ("pertamina mandalika international street circuit", "mandalika"),
    ("pertamina mandalika circuit", "mandalika"),
    ("chang international circuit", "buriram"),
    ("phillip island", "phillip_island"),
    ("sepang international circuit", "sepang"),
    ("petronas sepang international circuit", "sepang"),
    ("autodromo termas de rio hondo", "termas_de_rio_hondo"),
    ("autodromo internacional do algarve", "algarve"),
    ("autódromo internacional do algarve", "algarve"),
    ("grand prix of portugal", "algarve"),
    ("silverstone circuit", "silverstone"),
    ("sokol international racetrack", "sokol"),
    ("motorland aragón", "aragon"),
    ("motorland aragon", "aragon"),
    ("automotodrom brno", "cze"),
    ("balaton park circuit", "balaton"),
];

/// Case-insensitive, trimmed lookup.
pub fn slug_for(circuit_name: &str) -> Option<&'static str> {
    let needle = circuit_name.trim().to_lowercase();
    CIRCUIT_SLUGS
        .iter()
        .find(|(name, _)| *name == needle)
        .map(|(_, slug)| *slug)
}

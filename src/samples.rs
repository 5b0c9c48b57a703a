//! Bundled reference samples with known labels, for smoke-testing

use crate::model::SonarClass;
use crate::types::features::FEATURE_COUNT;

/// Sonar readings from a known rock return
pub const ROCK_REFERENCE: [f64; FEATURE_COUNT] = [
    0.0409, 0.0421, 0.0573, 0.013, 0.0183, 0.1019, 0.1054, 0.107, 0.2302, 0.2259, 0.2373, 0.3323,
    0.3827, 0.484, 0.6812, 0.7555, 0.9522, 0.9826, 0.8871, 0.8268, 0.7561, 0.8217, 0.6967, 0.6444,
    0.6948, 0.8014, 0.6053, 0.6084, 0.8877, 0.8557, 0.5563, 0.2897, 0.3638, 0.4786, 0.2908, 0.0899,
    0.2043, 0.1707, 0.0407, 0.1286, 0.1581, 0.2191, 0.1701, 0.0971, 0.2217, 0.2732, 0.1874, 0.1062,
    0.0665, 0.0405, 0.0113, 0.0028, 0.0036, 0.0105, 0.012, 0.0087, 0.0061, 0.0061, 0.003, 0.0078,
];

/// Sonar readings from a known mine return
pub const MINE_REFERENCE: [f64; FEATURE_COUNT] = [
    0.0200, 0.0371, 0.0428, 0.0207, 0.0954, 0.0986, 0.1539, 0.1601, 0.3109, 0.2111, 0.1609, 0.1582,
    0.2238, 0.0645, 0.0660, 0.2273, 0.3100, 0.2999, 0.5078, 0.4797, 0.5783, 0.5071, 0.4328, 0.5550,
    0.6711, 0.6415, 0.7104, 0.8080, 0.6791, 0.3857, 0.1307, 0.2604, 0.5121, 0.7547, 0.8537, 0.8507,
    0.6692, 0.6097, 0.4943, 0.2744, 0.0510, 0.2834, 0.2825, 0.4256, 0.2641, 0.1386, 0.1051, 0.1343,
    0.0383, 0.0324, 0.0232, 0.0027, 0.0065, 0.0159, 0.0072, 0.0167, 0.0180, 0.0084, 0.0090, 0.0032,
];

/// Reference readings for a class
pub fn reference(class: SonarClass) -> &'static [f64; FEATURE_COUNT] {
    match class {
        SonarClass::Rock => &ROCK_REFERENCE,
        SonarClass::Mine => &MINE_REFERENCE,
    }
}

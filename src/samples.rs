use rand::Rng;

/// Built-in passages to type.
pub const SAMPLE_TEXTS: &[&str] = &[
    "The sun rose gently over the quiet village. Birds sang in the trees, and a light breeze carried the scent of fresh flowers. Children played in the street while their parents greeted each other with warm smiles. It was a perfect morning to begin the day.",
    "In 2025, cities around the world are changing faster than ever before. Electric cars now line the streets, silent yet powerful. Solar panels decorate rooftops, and vertical gardens climb up tall glass buildings. At the heart of this transformation are engineers, designers, and dreamers who believe in a cleaner future. But progress comes with challenges — balancing technology, nature, and human connection will always be the true test of innovation.",
    "Opportunities are like sunrises,” said the old traveler, “if you wait too long, you’ll miss them.” His words echoed in my mind as I walked through the crowded market. Stalls overflowed with colorful fabrics, steaming food, and sparkling jewelry. Vendors shouted prices — 200 rupees for a scarf, 50 for a glass of lemonade — while children darted between the aisles. The air was a chaotic mix of laughter, music, and the sizzling sound of street food being prepared. Every sense was alive, and every moment felt like a story waiting to be told.",
    "Late one autumn evening, the train sped along the winding tracks, cutting through fields bathed in moonlight. Passengers sat in quiet compartments, some reading, some lost in thought. In the dining car, a man in a gray coat stirred his coffee slowly, as if waiting for something — or someone. Outside, distant mountains rose like dark silhouettes against the star-filled sky. A sudden gust rattled the windows, and a faint whistle echoed through the night. It was a moment of stillness wrapped in motion, where the past, present, and future seemed to share the same breath.",
];

/// Where the current target text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleSource {
    /// Index into the built-in passages.
    Builtin(usize),
    /// Text supplied on the command line.
    Custom(String),
}

impl SampleSource {
    /// Builtin index is taken modulo the number of passages.
    pub fn builtin(idx: usize) -> Self {
        SampleSource::Builtin(idx % SAMPLE_TEXTS.len())
    }

    pub fn random() -> Self {
        let idx = rand::thread_rng().gen_range(0..SAMPLE_TEXTS.len());
        SampleSource::Builtin(idx)
    }

    pub fn text(&self) -> &str {
        match self {
            SampleSource::Builtin(idx) => SAMPLE_TEXTS[idx % SAMPLE_TEXTS.len()],
            SampleSource::Custom(text) => text,
        }
    }

    /// The following built-in passage, wrapping around. A custom prompt moves
    /// on to the first passage.
    pub fn next(&self) -> Self {
        match self {
            SampleSource::Builtin(idx) => Self::builtin(idx + 1),
            SampleSource::Custom(_) => Self::builtin(0),
        }
    }

    pub fn label(&self) -> String {
        match self {
            SampleSource::Builtin(idx) => format!("Sample {}", idx + 1),
            SampleSource::Custom(_) => "Custom".to_string(),
        }
    }
}

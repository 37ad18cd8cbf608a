use serde::{Deserialize, Serialize};

use crate::chroma::{self, cosine_similarity};
use crate::novelty;
use crate::rms;

/// A labeled span of the song. Sections partition `[0, duration]`
/// contiguously and in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub label: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Analysis hop in samples; the chroma window is twice this.
    pub hop: usize,
    /// Checkerboard kernel half width in seconds.
    pub kernel_half_s: f64,
    /// Minimum spacing between section boundaries in seconds.
    pub min_section_s: f64,
    /// Peak threshold is `mean + novelty_k * stddev` of positive novelty.
    pub novelty_k: f32,
    pub threshold_floor: f32,
    pub threshold_ceil: f32,
    pub smoothing_half_width: usize,
    /// Cosine similarity at or above which two sections are grouped as
    /// repetitions of the same material.
    pub similarity_threshold: f32,
    /// Below this many chroma frames the template fallback is used.
    pub min_frames: usize,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            hop: 4096,
            kernel_half_s: 1.5,
            min_section_s: 8.0,
            novelty_k: 1.0,
            threshold_floor: 0.15,
            threshold_ceil: 0.60,
            smoothing_half_width: 2,
            similarity_threshold: 0.88,
            min_frames: 16,
        }
    }
}

/// Segment a song into labeled structural sections via chroma self-similarity.
pub fn detect_sections(samples: &[f32], sample_rate: u32, config: &StructureConfig) -> Vec<Section> {
    if samples.is_empty() || sample_rate == 0 {
        return Vec::new();
    }
    let duration = samples.len() as f64 / sample_rate as f64;

    let chroma = chroma::chroma_frames(samples, sample_rate, config.hop);
    if chroma.len() < config.min_frames {
        tracing::debug!(
            chroma_frames = chroma.len(),
            min_frames = config.min_frames,
            "too few frames for self-similarity, using template sections"
        );
        return template_sections(duration);
    }

    let ssm = novelty::self_similarity(&chroma);
    let kernel = ((config.kernel_half_s * sample_rate as f64 / config.hop as f64).round()
        as usize)
        .max(2);
    let mut curve = novelty::checkerboard_novelty(&ssm, kernel);
    curve = novelty::smooth(&curve, config.smoothing_half_width);
    novelty::normalize_to_peak(&mut curve);

    let threshold = novelty::adaptive_peak_threshold(
        &curve,
        config.novelty_k,
        config.threshold_floor,
        config.threshold_ceil,
    );
    let min_spacing =
        ((config.min_section_s * sample_rate as f64 / config.hop as f64) as usize).max(1);
    let peaks = novelty::pick_peaks(&curve, threshold, min_spacing);

    let frame_to_sec = config.hop as f64 / sample_rate as f64;
    let mut bounds = Vec::with_capacity(peaks.len() + 2);
    bounds.push(0usize);
    bounds.extend(peaks);
    bounds.push(chroma.len());

    let spans: Vec<(f64, f64)> = bounds
        .windows(2)
        .map(|w| {
            let start = w[0] as f64 * frame_to_sec;
            let end = if w[1] == chroma.len() {
                duration
            } else {
                w[1] as f64 * frame_to_sec
            };
            (start, end)
        })
        .collect();

    let labels = label_sections(&spans, &bounds, &chroma, samples, sample_rate, config);

    tracing::debug!(
        section_count = spans.len(),
        threshold,
        "segmented song structure"
    );

    spans
        .into_iter()
        .zip(labels)
        .map(|((start, end), label)| Section { label, start, end })
        .collect()
}

fn label_sections(
    spans: &[(f64, f64)],
    bounds: &[usize],
    chroma: &[[f32; 12]],
    samples: &[f32],
    sample_rate: u32,
    config: &StructureConfig,
) -> Vec<String> {
    let n = spans.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec!["Full Song".to_string()];
    }

    let energies: Vec<f32> = spans
        .iter()
        .map(|&(start, end)| {
            rms::span_rms(
                samples,
                (start * sample_rate as f64) as usize,
                (end * sample_rate as f64) as usize,
            )
        })
        .collect();
    let mean_energy = energies.iter().sum::<f32>() / n as f32;
    let high: Vec<bool> = energies.iter().map(|&e| e >= mean_energy).collect();

    let profiles: Vec<[f32; 12]> = (0..n)
        .map(|i| section_profile(chroma, bounds[i], bounds[i + 1]))
        .collect();

    let mut groups = DisjointSet::new(n);
    for i in 0..n {
        for j in i + 1..n {
            if cosine_similarity(&profiles[i], &profiles[j]) >= config.similarity_threshold {
                groups.union(i, j);
            }
        }
    }
    let roots: Vec<usize> = (0..n).map(|i| groups.find(i)).collect();
    let mut group_size = vec![0usize; n];
    for &root in &roots {
        group_size[root] += 1;
    }
    let repeated = |i: usize| group_size[roots[i]] >= 2;

    let mut labels = vec![String::new(); n];
    let mut chorus_count = 0usize;
    let mut verse_count = 0usize;
    for i in 0..n {
        labels[i] = if i == 0 && !high[i] {
            "Intro".to_string()
        } else if i == n - 1 && !high[i] {
            "Outro".to_string()
        } else if repeated(i) && high[i] {
            chorus_count += 1;
            format!("Chorus {chorus_count}")
        } else if !repeated(i) && !high[i] {
            "Bridge".to_string()
        } else {
            verse_count += 1;
            format!("Verse {verse_count}")
        };
    }
    labels
}

fn section_profile(chroma: &[[f32; 12]], start: usize, end: usize) -> [f32; 12] {
    let end = end.min(chroma.len());
    let mut sum = [0.0f32; 12];
    if start >= end {
        return sum;
    }
    for frame in &chroma[start..end] {
        for (s, &v) in sum.iter_mut().zip(frame.iter()) {
            *s += v;
        }
    }
    let count = (end - start) as f32;
    for s in sum.iter_mut() {
        *s /= count;
    }
    chroma::normalize(&sum)
}

/// Position-based fallback labels for inputs too short for self-similarity.
fn template_sections(duration: f64) -> Vec<Section> {
    if duration <= 0.0 {
        return Vec::new();
    }
    let count = ((duration / 30.0).round() as usize).clamp(1, 9);
    let labels = template_labels(count);
    let step = duration / count as f64;
    labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| Section {
            label,
            start: i as f64 * step,
            end: if i + 1 == count {
                duration
            } else {
                (i + 1) as f64 * step
            },
        })
        .collect()
}

fn template_labels(count: usize) -> Vec<String> {
    let template: &[&str] = match count {
        0 => &[],
        1 => &["Full Song"],
        2 => &["Verse", "Chorus"],
        3 => &["Intro", "Verse", "Chorus"],
        4 => &["Intro", "Verse 1", "Chorus 1", "Outro"],
        5 => &["Intro", "Verse 1", "Chorus 1", "Verse 2", "Chorus 2"],
        6 => &["Intro", "Verse 1", "Chorus 1", "Verse 2", "Chorus 2", "Outro"],
        7 => &[
            "Intro", "Verse 1", "Chorus 1", "Verse 2", "Chorus 2", "Bridge", "Outro",
        ],
        8 => &[
            "Intro", "Verse 1", "Chorus 1", "Verse 2", "Chorus 2", "Bridge", "Chorus 3", "Outro",
        ],
        9 => &[
            "Intro",
            "Verse 1",
            "Pre-Chorus",
            "Chorus 1",
            "Verse 2",
            "Pre-Chorus",
            "Chorus 2",
            "Bridge",
            "Outro",
        ],
        other => {
            return (1..=other).map(|i| format!("Section {i}")).collect();
        }
    };
    template.iter().map(|s| s.to_string()).collect()
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            let root = self.find(self.parent[i]);
            self.parent[i] = root;
        }
        self.parent[i]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

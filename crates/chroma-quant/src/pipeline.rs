//! Pipeline orchestration: sampling, palette training, mode selection.
//!
//! [`Quantizer`] drives the whole reduction: it shuffles the image's
//! pixels with a seedable generator, trains the clusterer on the
//! configured fraction of them, picks the output representation from the
//! final palette size, and runs the dither engine over the full image.
//! The two phases are exposed separately ([`Quantizer::train`] and
//! [`Quantizer::render`]) so callers can report progress between them;
//! [`quantize`] composes both.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::cluster::{Metric, OnlineClusterer};
use crate::color::{ciede2000, Lab, LinearRgb, Srgb, Xyz, CIEDE2000_SRGB_CEILING};
use crate::dither::{dither_to_indexed, dither_to_rgb};
use crate::error::QuantizeError;
use crate::output::QuantizedImage;

/// Largest palette an 8-bit index grid can address.
const MAX_INDEXED_PALETTE: usize = 256;

/// The CIEDE2000 distance between two XYZ points, the metric the palette
/// is learned and matched under.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerceptualMetric;

impl Metric<Xyz> for PerceptualMetric {
    #[inline]
    fn distance(&self, a: &Xyz, b: &Xyz) -> f64 {
        ciede2000(Lab::from(*a), Lab::from(*b))
    }
}

/// Configuration for the quantization pipeline.
///
/// The two thresholds are percentages of the largest CIEDE2000 distance
/// the sRGB gamut can produce ([`CIEDE2000_SRGB_CEILING`]); they are
/// converted to absolute distances before training.
///
/// # Example
///
/// ```
/// use chroma_quant::QuantizerOptions;
///
/// let options = QuantizerOptions::new()
///     .max_colors(64)
///     .learning_portion(80)
///     .seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct QuantizerOptions {
    /// Maximum number of palette entries. Sizes through 256 produce
    /// indexed output; larger palettes stay full-colour.
    pub max_colors: usize,

    /// Percentage of the image's pixels used for training (0-100).
    pub learning_portion: u8,

    /// How different two colours must be, as a percentage of the gamut
    /// ceiling, to count as distinct when founding new palette entries.
    pub difference_threshold: f64,

    /// How close two palette entries must be, as a percentage of the
    /// gamut ceiling, to be merged when capacity runs out.
    pub sameness_threshold: f64,

    /// Exponential-moving-average rate for palette updates (0, 1].
    pub learning_rate: f64,

    /// Seed for the sampling shuffle. `None` draws one from entropy;
    /// fixing it makes the whole pipeline deterministic.
    pub seed: Option<u64>,
}

impl Default for QuantizerOptions {
    fn default() -> Self {
        Self {
            max_colors: 16,
            learning_portion: 50,
            difference_threshold: 50.0,
            sameness_threshold: 50.0,
            learning_rate: 1e-4,
            seed: None,
        }
    }
}

impl QuantizerOptions {
    /// Create options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum palette size.
    #[inline]
    pub fn max_colors(mut self, max_colors: usize) -> Self {
        self.max_colors = max_colors;
        self
    }

    /// Set the training sample percentage (0-100).
    #[inline]
    pub fn learning_portion(mut self, percent: u8) -> Self {
        self.learning_portion = percent;
        self
    }

    /// Set the difference threshold percentage.
    #[inline]
    pub fn difference_threshold(mut self, percent: f64) -> Self {
        self.difference_threshold = percent;
        self
    }

    /// Set the sameness threshold percentage.
    #[inline]
    pub fn sameness_threshold(mut self, percent: f64) -> Self {
        self.sameness_threshold = percent;
        self
    }

    /// Set the learning rate.
    #[inline]
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Fix the sampling shuffle seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Two-phase driver of the quantization pipeline.
pub struct Quantizer {
    options: QuantizerOptions,
    clusterer: OnlineClusterer<Xyz, PerceptualMetric>,
}

impl Quantizer {
    /// Create a quantizer with an empty palette.
    pub fn new(options: QuantizerOptions) -> Self {
        Self {
            options,
            clusterer: OnlineClusterer::new(PerceptualMetric),
        }
    }

    /// Train the palette on a shuffled sample of `image`.
    ///
    /// The pixels are copied, permuted with the configured seed, and the
    /// first `learning_portion` percent are fed to the clusterer one at a
    /// time, in order. Returns the number of samples consumed.
    ///
    /// Training is strictly sequential: every step depends on the state
    /// the previous one left behind.
    pub fn train(&mut self, image: &[Srgb]) -> usize {
        let mut samples: Vec<Srgb> = image.to_vec();
        let mut rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        samples.shuffle(&mut rng);
        let count =
            (samples.len() * usize::from(self.options.learning_portion) / 100).min(samples.len());

        let max_distance = CIEDE2000_SRGB_CEILING * self.options.difference_threshold / 100.0;
        let min_distance = CIEDE2000_SRGB_CEILING * self.options.sameness_threshold / 100.0;
        for &pixel in &samples[..count] {
            self.clusterer.train_step(
                Xyz::from(LinearRgb::from(pixel)),
                self.options.max_colors,
                max_distance,
                min_distance,
                self.options.learning_rate,
            );
        }
        count
    }

    /// Number of palette entries learned so far.
    #[inline]
    pub fn palette_len(&self) -> usize {
        self.clusterer.len()
    }

    /// Dither the full image onto the learned palette.
    ///
    /// Palettes of up to 256 entries produce [`QuantizedImage::Indexed`]
    /// output; anything larger cannot fit an 8-bit index and produces
    /// [`QuantizedImage::TrueColor`].
    ///
    /// # Errors
    ///
    /// Fails with the untrained-clusterer error when [`Quantizer::train`]
    /// consumed no samples, and with a dimension mismatch when
    /// `image.len()` is not `width * height`.
    pub fn render(
        &self,
        image: &[Srgb],
        width: usize,
        height: usize,
    ) -> Result<QuantizedImage, QuantizeError> {
        if self.clusterer.len() > MAX_INDEXED_PALETTE {
            let pixels = dither_to_rgb(image, width, height, &self.clusterer)?;
            Ok(QuantizedImage::TrueColor {
                pixels,
                width,
                height,
            })
        } else {
            let indices = dither_to_indexed(image, width, height, &self.clusterer)?;
            let palette = self
                .clusterer
                .groups()
                .iter()
                .map(|&xyz| Srgb::from(LinearRgb::from(xyz).clamped()))
                .collect();
            Ok(QuantizedImage::Indexed {
                indices,
                palette,
                width,
                height,
            })
        }
    }
}

/// Run the whole pipeline in one call: train on a sample of `image`,
/// then dither it onto the learned palette.
///
/// # Errors
///
/// See [`Quantizer::render`].
pub fn quantize(
    image: &[Srgb],
    width: usize,
    height: usize,
    options: &QuantizerOptions,
) -> Result<QuantizedImage, QuantizeError> {
    let mut quantizer = Quantizer::new(options.clone());
    quantizer.train(image);
    quantizer.render(image, width, height)
}

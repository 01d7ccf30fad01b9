//! Audio Engine
//!
//! Buffers, WAV I/O and the two traits every signal block implements:
//! [`Source`] for generators and [`Processor`] for filters.

pub mod buffer;
pub mod io;

pub use buffer::{linear_to_db, AudioBuffer, ChannelLayout, DEFAULT_SAMPLE_RATE};
pub use io::{export_wav, import_wav};

/// A sample-by-sample filter
pub trait Processor {
    /// Process one sample
    fn process_sample(&mut self, input: f32) -> f32;

    /// Clear internal history
    fn reset(&mut self);

    /// Process a block in place
    fn process(&mut self, block: &mut [f32]) {
        for sample in block.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}

/// A mono signal generator
pub trait Source {
    /// Produce the next output sample
    fn next_sample(&mut self) -> f32;

    /// Return to the initial state
    fn reset(&mut self);

    /// Sample rate the generator runs at
    fn sample_rate(&self) -> u32;

    /// Fill a block with consecutive samples
    fn fill(&mut self, block: &mut [f32]) {
        for sample in block.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Render `duration_secs` of audio into a fresh mono buffer
    fn render(&mut self, duration_secs: f64) -> AudioBuffer {
        let num_samples = (duration_secs.max(0.0) * self.sample_rate() as f64).round() as usize;
        let mut samples = vec![0.0; num_samples];
        self.fill(&mut samples);
        AudioBuffer::from_mono(samples, self.sample_rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        n: f32,
    }

    impl Source for Counter {
        fn next_sample(&mut self) -> f32 {
            self.n += 1.0;
            self.n
        }

        fn reset(&mut self) {
            self.n = 0.0;
        }

        fn sample_rate(&self) -> u32 {
            10
        }
    }

    struct Doubler;

    impl Processor for Doubler {
        fn process_sample(&mut self, input: f32) -> f32 {
            input * 2.0
        }

        fn reset(&mut self) {}
    }

    #[test]
    fn test_render_length() {
        let mut counter = Counter { n: 0.0 };
        let buffer = counter.render(0.5);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.channel(0), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(buffer.sample_rate, 10);

        counter.reset();
        assert_eq!(counter.next_sample(), 1.0);
    }

    #[test]
    fn test_render_negative_duration_is_empty() {
        let mut counter = Counter { n: 0.0 };
        assert!(counter.render(-1.0).is_empty());
    }

    #[test]
    fn test_process_block() {
        let mut block = [1.0, -2.0, 0.5];
        Doubler.process(&mut block);
        assert_eq!(block, [2.0, -4.0, 1.0]);
    }
}

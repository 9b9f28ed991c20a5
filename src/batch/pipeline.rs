use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::batch::{
    error::{BatchError, Result},
    image_reader::ImageCrateReader,
    reader::ImageReader,
    scan::find_images,
    standard_writer::StandardAnalysisWriter,
    types::BatchMode,
    writer::AnalysisWriter,
};
use crate::histogram::HistogramEngine;

/// `<input>` with the mode's suffix appended, e.g. `photo.jpg_hist.png`.
pub fn output_path<P: AsRef<Path>>(input: P, mode: BatchMode) -> PathBuf {
    let mut path = OsString::from(input.as_ref().as_os_str());
    path.push(mode.output_suffix());
    PathBuf::from(path)
}

pub struct BatchPipeline<R: ImageReader, W: AnalysisWriter> {
    reader: R,
    writer: W,
    engine: HistogramEngine,
    mode: BatchMode,
}

impl BatchPipeline<ImageCrateReader, StandardAnalysisWriter> {
    pub fn new(engine: HistogramEngine, mode: BatchMode) -> Self {
        Self {
            reader: ImageCrateReader,
            writer: StandardAnalysisWriter,
            engine,
            mode,
        }
    }
}

impl<R: ImageReader, W: AnalysisWriter> BatchPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, engine: HistogramEngine, mode: BatchMode) -> Self {
        Self {
            reader,
            writer,
            engine,
            mode,
        }
    }

    /// Decodes `input_data`, analyses it and writes the mode's output.
    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn process(&mut self, input_data: &[u8], output: &mut dyn Write) -> Result<()> {
        let image = {
            let _span = tracing::info_span!("decode_image").entered();
            self.reader.read_rgb(input_data)?
        };

        {
            let _span = tracing::info_span!("analyse",
                width = image.width,
                height = image.height
            ).entered();
            self.engine.analyse(&image.as_pixel_buffer())?;
        }

        {
            let _span = tracing::info_span!("write_output").entered();
            match self.mode {
                BatchMode::Histogram => {
                    let histogram = self.engine.histogram_image()?;
                    self.writer.write_histogram(&histogram, output)?;
                }
                BatchMode::Stats => {
                    let stats = self.engine.colour_stats()?;
                    self.writer.write_stats(&stats, output)?;
                }
            }
        }

        Ok(())
    }

    /// Processes one file and returns the path written.
    ///
    /// The output file is only created once processing has succeeded.
    #[instrument(skip(self, input_path))]
    pub fn process_file<P: AsRef<Path>>(&mut self, input_path: P) -> Result<PathBuf> {
        let input_path = input_path.as_ref();
        let output_path = output_path(input_path, self.mode);

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                BatchError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let mut encoded = Vec::new();
        self.process(&input_data, &mut encoded)?;

        {
            let _span = tracing::info_span!("write_output_file").entered();
            std::fs::write(&output_path, &encoded).map_err(|e| {
                BatchError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        Ok(output_path)
    }

    /// Processes every supported image under `root`, stopping at the first
    /// failure. Returns the written paths in processing order.
    pub fn run<P: AsRef<Path>>(&mut self, root: P) -> Result<Vec<PathBuf>> {
        self.run_with_progress(root, |_| {})
    }

    /// Like [`run`](Self::run), calling `on_processed` with each input path
    /// once its output has been written.
    #[instrument(skip(self, root, on_processed))]
    pub fn run_with_progress<P, F>(&mut self, root: P, mut on_processed: F) -> Result<Vec<PathBuf>>
    where
        P: AsRef<Path>,
        F: FnMut(&Path),
    {
        let root = root.as_ref();
        let images = find_images(root)?;

        info!(
            root = %root.display(),
            images = images.len(),
            mode = ?self.mode,
            "Starting batch"
        );

        let mut outputs = Vec::with_capacity(images.len());
        for image in &images {
            outputs.push(self.process_file(image)?);
            debug!("Processed: {}", image.display());
            on_processed(image);
        }

        Ok(outputs)
    }
}

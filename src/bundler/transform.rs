//! Per-file transform capability.
//!
//! A [`Transform`] rewrites one source file (minification, for example)
//! before it is hashed and concatenated into the bundle. Bundles whose kind
//! has no registered transform copy their sources verbatim.

use std::{
    collections::HashMap,
    fmt,
    io::{Read, Write},
    path::PathBuf,
    process::{Command, Stdio},
    sync::Arc,
};

use anyhow::{Context as _, anyhow};

use crate::bundler::{ContentKind, Error, Result};

/// Rewrites one source into the bundle output.
///
/// Implemented for any `Fn(&ContentKind, &mut dyn Write, &mut dyn Read) -> anyhow::Result<()>`.
pub trait Transform: Send + Sync {
    /// Reads `input` completely and writes the transformed bytes to `output`.
    fn transform(
        &self,
        kind: &ContentKind,
        output: &mut dyn Write,
        input: &mut dyn Read,
    ) -> anyhow::Result<()>;
}

impl<F> Transform for F
where
    F: Fn(&ContentKind, &mut dyn Write, &mut dyn Read) -> anyhow::Result<()> + Send + Sync,
{
    fn transform(
        &self,
        kind: &ContentKind,
        output: &mut dyn Write,
        input: &mut dyn Read,
    ) -> anyhow::Result<()> {
        self(kind, output, input)
    }
}

/// Transforms indexed by MIME type. At most one per type.
#[derive(Clone, Default)]
pub struct TransformRegistry {
    transforms: HashMap<String, Arc<dyn Transform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `transform` for `kind`.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateTransform`] if one is already registered for the kind's MIME type.
    pub fn register(&mut self, kind: &ContentKind, transform: Arc<dyn Transform>) -> Result<()> {
        let mime = kind.mime().to_string();
        if self.transforms.contains_key(&mime) {
            return Err(Error::DuplicateTransform(mime));
        }
        self.transforms.insert(mime, transform);
        Ok(())
    }

    pub fn get(&self, kind: &ContentKind) -> Option<&dyn Transform> {
        self.transforms.get(kind.mime()).map(|t| t.as_ref())
    }

    pub fn contains(&self, kind: &ContentKind) -> bool {
        self.transforms.contains_key(kind.mime())
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.transforms.keys()).finish()
    }
}

/// Pipes each source through an external program (stdin → stdout).
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_assets::bundler::CommandTransform;
///
/// # fn example() -> kodegen_bundler_assets::bundler::Result<()> {
/// let terser = CommandTransform::new("terser", ["--compress", "--mangle"])?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CommandTransform {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandTransform {
    /// Resolves `program` on `PATH`.
    pub fn new<I, S>(program: &str, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resolved = which::which(program).map_err(|e| {
            Error::GenericError(format!("transform program {program} not found: {e}"))
        })?;
        log::debug!("Using transform program {}", resolved.display());
        Ok(Self {
            program: resolved,
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    /// Parses a shell-style command line (whitespace separated, no quoting).
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace();
        let Some(program) = parts.next() else {
            crate::bail!("empty transform command");
        };
        Self::new(program, parts)
    }
}

impl Transform for CommandTransform {
    fn transform(
        &self,
        kind: &ContentKind,
        output: &mut dyn Write,
        input: &mut dyn Read,
    ) -> anyhow::Result<()> {
        let mut source = Vec::new();
        input.read_to_end(&mut source).context("reading source")?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("BUNDLE_CONTENT_TYPE", kind.mime())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawning {}", self.program.display()))?;

        // Feed stdin from another thread so a chatty child cannot deadlock on a full stdout pipe.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("child stdin unavailable"))?;
        let feeder = std::thread::spawn(move || stdin.write_all(&source));

        let result = child.wait_with_output()?;
        let fed = feeder
            .join()
            .map_err(|_| anyhow!("stdin writer panicked"))?;

        // A failing program may close stdin early; report its exit status rather than the broken pipe.
        if !result.status.success() {
            return Err(anyhow!(
                "{} exited with {}: {}",
                self.program.display(),
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            ));
        }
        fed.context("writing source to transform")?;
        output.write_all(&result.stdout)?;
        Ok(())
    }
}

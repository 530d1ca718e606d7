//! Progressive rendering of a streamed model response.
//!
//! A response moves through `Pending → Streaming → Settled | Failed`. Every
//! chunk re-renders the whole accumulated source, since a partial chunk can
//! leave a markdown construct (fence, list, table) open.

use std::fmt::Display;

use futures_util::{Stream, StreamExt};

use crate::markdown::MarkdownRenderer;

/// Text shown in place of a response that failed mid-flight.
pub const STREAM_ERROR_MESSAGE: &str =
    "Something went wrong while generating the response. Please try again.";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Model,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Model => "model",
        }
    }
}

/// A display surface holding an ordered list of message containers.
///
/// Containers returned by `append` are mutated in place; no new container is
/// created when a streamed response updates.
pub trait MessageView {
    type Handle: Copy;
    type Rendered;

    /// Appends a message, either as a loading placeholder or rendered from
    /// `content`, then scrolls to the bottom.
    fn append(&mut self, sender: Sender, content: &str, loading: bool) -> Self::Handle;

    /// Removes the container's current content (including the placeholder).
    fn clear(&mut self, handle: Self::Handle);

    fn set_rendered(&mut self, handle: Self::Handle, rendered: Self::Rendered);

    fn set_error(&mut self, handle: Self::Handle, message: &str);

    fn scroll_to_bottom(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    Pending,
    Streaming,
    Settled,
    Failed,
}

impl StreamPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, StreamPhase::Settled | StreamPhase::Failed)
    }
}

/// Per-response rendering state bound to one message container.
#[derive(Debug, Clone)]
pub struct StreamingRenderer<H> {
    handle: H,
    phase: StreamPhase,
    source: String,
}

impl<H: Copy> StreamingRenderer<H> {
    /// Starts in `Pending`; `handle` must point at a loading placeholder.
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            phase: StreamPhase::Pending,
            source: String::new(),
        }
    }

    pub fn handle(&self) -> H {
        self.handle
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    /// Markdown source accumulated so far.
    pub fn text(&self) -> &str {
        &self.source
    }

    /// Applies the next chunk. Ignored once the response is settled or failed.
    pub fn apply_chunk<V, R>(&mut self, view: &mut V, renderer: &R, chunk: &str)
    where
        V: MessageView<Handle = H>,
        R: MarkdownRenderer<Output = V::Rendered>,
    {
        match self.phase {
            StreamPhase::Settled | StreamPhase::Failed => return,
            StreamPhase::Pending => {
                view.clear(self.handle);
                self.phase = StreamPhase::Streaming;
            }
            StreamPhase::Streaming => {}
        }

        self.source.push_str(chunk);
        view.set_rendered(self.handle, renderer.render(&self.source));
        view.scroll_to_bottom();
    }

    /// Marks the response complete.
    ///
    /// A response with no chunks still loses its placeholder and ends as an
    /// empty rendered message.
    pub fn settle<V, R>(&mut self, view: &mut V, renderer: &R)
    where
        V: MessageView<Handle = H>,
        R: MarkdownRenderer<Output = V::Rendered>,
    {
        match self.phase {
            StreamPhase::Settled | StreamPhase::Failed => return,
            StreamPhase::Pending => {
                view.clear(self.handle);
                view.set_rendered(self.handle, renderer.render(""));
            }
            StreamPhase::Streaming => {}
        }
        self.phase = StreamPhase::Settled;
    }

    /// Replaces whatever was rendered with the fixed error message.
    pub fn fail<V>(&mut self, view: &mut V)
    where
        V: MessageView<Handle = H>,
    {
        if self.phase.is_terminal() {
            return;
        }
        view.set_error(self.handle, STREAM_ERROR_MESSAGE);
        view.scroll_to_bottom();
        self.phase = StreamPhase::Failed;
    }
}

/// How a driven response ended.
#[derive(Debug)]
pub enum StreamOutcome<E> {
    /// Full response text.
    Settled(String),
    Failed(E),
}

/// Consumes `chunks` in arrival order, rendering into `handle` until the
/// stream ends or yields an error.
pub async fn drive<S, E, V, R>(
    mut chunks: S,
    view: &mut V,
    renderer: &R,
    handle: V::Handle,
) -> StreamOutcome<E>
where
    S: Stream<Item = Result<String, E>> + Unpin,
    E: Display,
    V: MessageView,
    R: MarkdownRenderer<Output = V::Rendered>,
{
    let mut state = StreamingRenderer::new(handle);

    while let Some(item) = chunks.next().await {
        match item {
            Ok(chunk) => state.apply_chunk(view, renderer, &chunk),
            Err(err) => {
                tracing::warn!(error = %err, "response stream failed");
                state.fail(view);
                return StreamOutcome::Failed(err);
            }
        }
    }

    state.settle(view, renderer);
    tracing::debug!(chars = state.text().len(), "response settled");
    StreamOutcome::Settled(state.source)
}

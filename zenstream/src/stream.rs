//! Flux d'octets d'un encodeur, lu par blocs de taille fixe
//!
//! Le flux appelle son crochet de fin exactement une fois : en fin de
//! sortie, sur erreur de lecture, ou quand le consommateur le lâche
//! (déconnexion du client HTTP).

use bytes::Bytes;
use futures::Stream;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::process::ChildStdout;
use tokio_util::io::ReaderStream;

type FinishHook = Box<dyn FnOnce() + Send>;

pub struct TranscodeStream {
    inner: Option<ReaderStream<ChildStdout>>,
    on_finish: Option<FinishHook>,
}

impl TranscodeStream {
    pub fn new(
        stdout: ChildStdout,
        chunk_size: usize,
        on_finish: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            inner: Some(ReaderStream::with_capacity(stdout, chunk_size.max(1))),
            on_finish: Some(Box::new(on_finish)),
        }
    }

    /// Flux terminé d'emblée, sans aucun octet
    pub fn empty() -> Self {
        Self {
            inner: None,
            on_finish: None,
        }
    }

    fn finish(&mut self) {
        self.inner = None;
        if let Some(hook) = self.on_finish.take() {
            hook();
        }
    }
}

impl Stream for TranscodeStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(inner) = self.inner.as_mut() else {
            return Poll::Ready(None);
        };

        match Pin::new(inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => Poll::Ready(Some(Ok(chunk))),
            Poll::Ready(Some(Err(e))) => {
                self.finish();
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.finish();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for TranscodeStream {
    fn drop(&mut self) {
        self.finish();
    }
}

use super::Record;

use std::{
    collections::VecDeque,
    fmt,
    pin::Pin,
    task::{Context, Poll},
};
use tokio_stream::{Stream, StreamExt};

/// A stream of flat result rows, as delivered by a driver connection.
///
/// Each row is a [`Record`] keyed by the literal alias strings the planner
/// generated. Small result sets can be delivered from a buffer; large ones
/// through an inner stream over a database cursor, which is dropped with the
/// `RowStream`.
#[derive(Default)]
pub struct RowStream {
    buffer: VecDeque<Record>,
    stream: Option<DynStream>,
}

type DynStream = Pin<Box<dyn Stream<Item = crate::Result<Record>> + Send + 'static>>;

impl RowStream {
    pub fn from_vec(rows: Vec<Record>) -> Self {
        Self {
            buffer: rows.into(),
            stream: None,
        }
    }

    pub fn from_stream<T>(stream: T) -> Self
    where
        T: Stream<Item = crate::Result<Record>> + Send + 'static,
    {
        Self {
            buffer: VecDeque::new(),
            stream: Some(Box::pin(stream)),
        }
    }

    /// Returns the next row in the stream
    pub async fn next(&mut self) -> Option<crate::Result<Record>> {
        StreamExt::next(self).await
    }

    pub async fn collect(mut self) -> crate::Result<Vec<Record>> {
        let mut ret = Vec::with_capacity(self.buffer.len());

        while let Some(res) = self.next().await {
            ret.push(res?);
        }

        Ok(ret)
    }
}

impl From<Vec<Record>> for RowStream {
    fn from(rows: Vec<Record>) -> Self {
        Self::from_vec(rows)
    }
}

impl Stream for RowStream {
    type Item = crate::Result<Record>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(row) = self.buffer.pop_front() {
            return Poll::Ready(Some(Ok(row)));
        }

        match &mut self.stream {
            Some(stream) => stream.as_mut().poll_next(cx),
            None => Poll::Ready(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let buffered = self.buffer.len();
        match &self.stream {
            Some(stream) => {
                let (lower, upper) = stream.size_hint();
                (buffered + lower, upper.map(|u| buffered + u))
            }
            None => (buffered, Some(buffered)),
        }
    }
}

impl fmt::Debug for RowStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowStream")
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}

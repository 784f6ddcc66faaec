//! The fetch-until-exhausted walk shared by every paginated sequence
//!
//! A walk alternates two steps. The emit pass hands out every buffered
//! element at or after the current start offset. The fetch step asks the
//! sequence for one more page. It stops when the sequence reports it is
//! finished, or when a pass after a fetch turned up nothing new
//! `empty_response_limit` times in a row.

use super::types::{Paginated, WalkOptions};
use crate::error::{Error, Result};
use futures::future::BoxFuture;
use futures::stream::{unfold, BoxStream, Stream, StreamExt};
use futures::{FutureExt, TryStreamExt};
use tracing::debug;

/// Pull-based state of one walk
///
/// [`Walk::advance`] returns the buffer index of the next element to emit.
/// Both [`for_each`] and [`stream`] are thin drivers over it.
pub struct Walk<'a, S: Paginated + ?Sized> {
    sequence: &'a mut S,
    /// Offset the current emit pass started from
    start: usize,
    /// Next buffer index to emit
    position: usize,
    without_new: u32,
    empty_limit: u32,
    /// Whether the current pass has emitted anything
    emitted: bool,
    pages_fetched: u64,
    done: bool,
}

impl<'a, S: Paginated + ?Sized> Walk<'a, S> {
    /// Begin a walk over `sequence`
    pub fn new(sequence: &'a mut S, options: WalkOptions) -> Self {
        Self {
            sequence,
            start: options.start,
            position: options.start,
            without_new: 0,
            empty_limit: options.effective_empty_limit(),
            emitted: false,
            pages_fetched: 0,
            done: false,
        }
    }

    /// Index of the next element to emit, or `None` once the walk has ended
    ///
    /// A failed page fetch ends the walk and is returned as
    /// [`Error::PageFetch`]; the sequence is left untouched so another walk
    /// can resume from the same position.
    pub async fn advance(&mut self) -> Result<Option<usize>> {
        loop {
            if self.done {
                return Ok(None);
            }

            if self.position < self.sequence.collection().len() {
                let index = self.position;
                self.position += 1;
                self.emitted = true;
                return Ok(Some(index));
            }

            if self.sequence.is_finished() {
                debug!(
                    pages_fetched = self.pages_fetched,
                    "Sequence finished, ending walk"
                );
                self.done = true;
                return Ok(None);
            }

            // The opening pass of an unseeded sequence is not an empty round.
            if self.emitted {
                self.without_new = 0;
            } else if self.pages_fetched > 0 {
                self.without_new += 1;
            }

            if self.without_new >= self.empty_limit {
                debug!(
                    pages_fetched = self.pages_fetched,
                    empty_rounds = self.without_new,
                    "No new elements, ending walk"
                );
                self.done = true;
                return Ok(None);
            }

            self.start = self.sequence.collection().len().max(self.start);
            self.position = self.start;

            let page = self.pages_fetched + 1;
            debug!(page, start = self.start, "Fetching next page");
            if let Err(e) = self.sequence.fetch_next_page().await {
                self.done = true;
                return Err(Error::page_fetch(page, e));
            }
            self.pages_fetched = page;
            self.emitted = false;
        }
    }

    /// The sequence being walked
    pub fn sequence(&self) -> &S {
        &*self.sequence
    }

    /// Number of pages fetched by this walk so far
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    /// Whether the walk has ended
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Release the sequence
    pub fn into_inner(self) -> &'a mut S {
        self.sequence
    }
}

/// Drive a full walk, calling `f` for every emitted element
///
/// Returns the sequence itself so calls can be chained.
pub async fn for_each<S, F>(sequence: &mut S, options: WalkOptions, mut f: F) -> Result<&mut S>
where
    S: Paginated + ?Sized,
    F: FnMut(&S::Item),
{
    let mut walk = Walk::new(sequence, options);
    while let Some(index) = walk.advance().await? {
        f(&walk.sequence().collection()[index]);
    }
    Ok(walk.into_inner())
}

/// Lazily walk the sequence, fetching pages only as the stream is polled
///
/// A fetch failure is yielded once as an `Err` item, after which the stream
/// ends.
pub fn stream<S>(
    sequence: &mut S,
    options: WalkOptions,
) -> impl Stream<Item = Result<S::Item>> + Send + '_
where
    S: Paginated + ?Sized,
    S::Item: Clone,
{
    unfold(Walk::new(sequence, options), |mut walk| async move {
        match walk.advance().await {
            Ok(Some(index)) => {
                let item = walk.sequence().collection()[index].clone();
                Some((Ok(item), walk))
            }
            Ok(None) => None,
            Err(e) => Some((Err(e), walk)),
        }
    })
}

/// Method-call forms of the walk for every [`Paginated`] sequence
pub trait PaginatedExt: Paginated {
    /// Walk the whole sequence from the beginning
    fn for_each<'a, F>(&'a mut self, f: F) -> BoxFuture<'a, Result<&'a mut Self>>
    where
        F: FnMut(&Self::Item) + Send + 'a;

    /// Walk the sequence starting at buffer offset `start`
    fn for_each_from<'a, F>(
        &'a mut self,
        start: usize,
        f: F,
    ) -> BoxFuture<'a, Result<&'a mut Self>>
    where
        F: FnMut(&Self::Item) + Send + 'a;

    /// Lazy stream over the whole sequence
    fn stream(&mut self) -> BoxStream<'_, Result<Self::Item>>
    where
        Self::Item: Clone;

    /// Lazy stream with explicit walk options
    fn stream_with(&mut self, options: WalkOptions) -> BoxStream<'_, Result<Self::Item>>
    where
        Self::Item: Clone;

    /// Walk everything into a `Vec`
    fn collect_all(&mut self) -> BoxFuture<'_, Result<Vec<Self::Item>>>
    where
        Self::Item: Clone;
}

impl<S: Paginated + ?Sized> PaginatedExt for S {
    fn for_each<'a, F>(&'a mut self, f: F) -> BoxFuture<'a, Result<&'a mut Self>>
    where
        F: FnMut(&Self::Item) + Send + 'a,
    {
        for_each(self, WalkOptions::default(), f).boxed()
    }

    fn for_each_from<'a, F>(
        &'a mut self,
        start: usize,
        f: F,
    ) -> BoxFuture<'a, Result<&'a mut Self>>
    where
        F: FnMut(&Self::Item) + Send + 'a,
    {
        for_each(self, WalkOptions::default().start(start), f).boxed()
    }

    fn stream(&mut self) -> BoxStream<'_, Result<Self::Item>>
    where
        Self::Item: Clone,
    {
        stream(self, WalkOptions::default()).boxed()
    }

    fn stream_with(&mut self, options: WalkOptions) -> BoxStream<'_, Result<Self::Item>>
    where
        Self::Item: Clone,
    {
        stream(self, options).boxed()
    }

    fn collect_all(&mut self) -> BoxFuture<'_, Result<Vec<Self::Item>>>
    where
        Self::Item: Clone,
    {
        stream(self, WalkOptions::default()).try_collect().boxed()
    }
}

//! Off-thread rendering with request coalescing.
//!
//! At most one request is in flight at any time and at most one waits
//! behind it. Submitting while a request is waiting supersedes the waiting
//! one; its [`Ticket`] resolves to [`WorkerError::Cancelled`]. The work
//! itself is never interrupted.
use futures::channel::oneshot;
use log::{debug, trace};
use quick_error::quick_error;
use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::mpsc,
    task::{Context, Poll},
    thread::{self, JoinHandle},
};

quick_error! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum WorkerError {
        /// A newer request replaced this one before it was dispatched.
        Cancelled {
            display("the request was superseded by a newer one")
        }
        /// The worker went away before producing a result.
        Disconnected {
            display("the render worker is gone")
        }
    }
}

/// Identifies a request. Ids increase monotonically in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type Reply<T> = oneshot::Sender<Result<T, WorkerError>>;

/// The result of a submitted request, delivered asynchronously.
#[derive(Debug)]
pub struct Ticket<T> {
    id: RequestId,
    recv: oneshot::Receiver<Result<T, WorkerError>>,
}

impl<T> Ticket<T> {
    pub fn id(&self) -> RequestId {
        self.id
    }
}

impl<T> Future for Ticket<T> {
    type Output = Result<T, WorkerError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.recv).poll(cx).map(|result| match result {
            Ok(result) => result,
            Err(oneshot::Canceled) => Err(WorkerError::Disconnected),
        })
    }
}

struct Pending<Req, Resp> {
    id: RequestId,
    request: Req,
    reply: Reply<Resp>,
}

/// The queue discipline, without any threading.
pub struct Coalescer<Req, Resp> {
    next_id: u64,
    in_flight: Option<(RequestId, Reply<Resp>)>,
    pending: Option<Pending<Req, Resp>>,
}

impl<Req, Resp> fmt::Debug for Coalescer<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coalescer")
            .field("next_id", &self.next_id)
            .field("in_flight", &self.in_flight.as_ref().map(|x| x.0))
            .field("pending", &self.pending.as_ref().map(|x| x.id))
            .finish()
    }
}

impl<Req, Resp> Default for Coalescer<Req, Resp> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Resp> Coalescer<Req, Resp> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            in_flight: None,
            pending: None,
        }
    }

    /// Queue `request`, superseding the waiting request if there is one.
    pub fn submit(&mut self, request: Req) -> Ticket<Resp> {
        let id = RequestId(self.next_id);
        self.next_id += 1;

        if let Some(superseded) = self.pending.take() {
            debug!("request {} superseded by {}", superseded.id, id);
            let _ = superseded.reply.send(Err(WorkerError::Cancelled));
        }

        let (reply, recv) = oneshot::channel();
        self.pending = Some(Pending { id, request, reply });
        Ticket { id, recv }
    }

    /// Take the waiting request if nothing is in flight. The request becomes
    /// the in-flight one until [`Coalescer::complete`] is called.
    pub fn take_dispatch(&mut self) -> Option<(RequestId, Req)> {
        if self.in_flight.is_some() {
            return None;
        }
        let Pending { id, request, reply } = self.pending.take()?;
        trace!("dispatching request {}", id);
        self.in_flight = Some((id, reply));
        Some((id, request))
    }

    /// Deliver the response for the in-flight request.
    ///
    /// # Panics
    ///
    /// Panics if `id` isn't the in-flight request.
    pub fn complete(&mut self, id: RequestId, response: Resp) {
        match self.in_flight.take() {
            Some((in_flight_id, reply)) if in_flight_id == id => {
                trace!("request {} completed", id);
                // The caller may have dropped the ticket
                let _ = reply.send(Ok(response));
            }
            other => panic!(
                "completed request {}, but the in-flight request is {:?}",
                id,
                other.map(|x| x.0)
            ),
        }
    }

    /// Drop every outstanding request. Their tickets resolve to
    /// [`WorkerError::Disconnected`].
    pub fn abandon(&mut self) {
        self.in_flight = None;
        self.pending = None;
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Runs a job function on a background thread, feeding it through a
/// [`Coalescer`].
///
/// Results are collected by [`RenderWorker::pump`] or
/// [`RenderWorker::pump_blocking`] on the owning thread.
pub struct RenderWorker<Req, Resp> {
    coalescer: Coalescer<Req, Resp>,
    job_send: Option<mpsc::Sender<(RequestId, Req)>>,
    result_recv: mpsc::Receiver<(RequestId, Resp)>,
    thread: Option<JoinHandle<()>>,
}

impl<Req, Resp> fmt::Debug for RenderWorker<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderWorker")
            .field("coalescer", &self.coalescer)
            .finish()
    }
}

impl<Req, Resp> RenderWorker<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    pub fn new(mut job: impl FnMut(Req) -> Resp + Send + 'static) -> Self {
        let (job_send, job_recv) = mpsc::channel::<(RequestId, Req)>();
        let (result_send, result_recv) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("render worker".to_owned())
            .spawn(move || {
                for (id, request) in job_recv {
                    if result_send.send((id, job(request))).is_err() {
                        break;
                    }
                }
                debug!("render worker exiting");
            })
            .ok();

        let mut this = Self {
            coalescer: Coalescer::new(),
            job_send: None,
            result_recv,
            thread,
        };
        if this.thread.is_some() {
            this.job_send = Some(job_send);
        } else {
            log::warn!("could not spawn the render worker thread");
        }
        this
    }

    pub fn submit(&mut self, request: Req) -> Ticket<Resp> {
        let ticket = self.coalescer.submit(request);
        self.dispatch();
        ticket
    }

    fn dispatch(&mut self) {
        let job_send = match &self.job_send {
            Some(x) => x,
            None => {
                self.coalescer.abandon();
                return;
            }
        };
        if let Some(job) = self.coalescer.take_dispatch() {
            if job_send.send(job).is_err() {
                self.coalescer.abandon();
            }
        }
    }

    fn on_result(&mut self, id: RequestId, response: Resp) {
        self.coalescer.complete(id, response);
        self.dispatch();
    }

    /// Collect the results that are ready without blocking.
    pub fn pump(&mut self) {
        loop {
            match self.result_recv.try_recv() {
                Ok((id, response)) => self.on_result(id, response),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.coalescer.abandon();
                    break;
                }
            }
        }
    }

    /// Wait for the in-flight request to finish. Returns `false` if there
    /// was nothing to wait for.
    pub fn pump_blocking(&mut self) -> bool {
        if !self.coalescer.is_busy() {
            return false;
        }
        match self.result_recv.recv() {
            Ok((id, response)) => self.on_result(id, response),
            Err(mpsc::RecvError) => self.coalescer.abandon(),
        }
        true
    }

    /// Returns `true` if a request is in flight or waiting.
    pub fn is_rendering(&self) -> bool {
        self.coalescer.is_busy() || self.coalescer.has_pending()
    }
}

impl<Req, Resp> Drop for RenderWorker<Req, Resp> {
    fn drop(&mut self) {
        // Closing the job channel ends the thread's loop
        self.job_send = None;
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::sync::{Arc, Barrier};

    #[test]
    fn newest_pending_wins() {
        let mut queue = Coalescer::<u32, u32>::new();
        let first = queue.submit(1);
        assert_eq!(queue.take_dispatch(), Some((RequestId(0), 1)));

        let second = queue.submit(2);
        let third = queue.submit(3);
        assert_eq!(second.id(), RequestId(1));
        assert_eq!(third.id(), RequestId(2));
        assert_eq!(queue.take_dispatch(), None);

        queue.complete(RequestId(0), 10);
        assert_eq!(queue.take_dispatch(), Some((RequestId(2), 3)));
        queue.complete(RequestId(2), 30);

        assert_eq!(block_on(first), Ok(10));
        assert_eq!(block_on(second), Err(WorkerError::Cancelled));
        assert_eq!(block_on(third), Ok(30));
        assert!(!queue.is_busy() && !queue.has_pending());
    }

    #[test]
    #[should_panic]
    fn completing_the_wrong_request_panics() {
        let mut queue = Coalescer::<(), ()>::new();
        let _ticket = queue.submit(());
        queue.take_dispatch();
        queue.complete(RequestId(5), ());
    }

    #[test]
    fn abandoned_requests_disconnect() {
        let mut queue = Coalescer::<(), ()>::new();
        let ticket = queue.submit(());
        queue.abandon();
        assert_eq!(block_on(ticket), Err(WorkerError::Disconnected));
    }

    #[test]
    fn worker_round_trip() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut worker = RenderWorker::new(|x: u32| x * 2);
        let ticket = worker.submit(21);
        while worker.pump_blocking() {}
        assert_eq!(block_on(ticket), Ok(42));
        assert!(!worker.is_rendering());
    }

    #[test]
    fn worker_coalesces_while_busy() {
        let gate = Arc::new(Barrier::new(2));
        let worker_gate = Arc::clone(&gate);
        let mut worker = RenderWorker::new(move |x: u32| {
            if x == 0 {
                worker_gate.wait();
            }
            x
        });

        // Request 0 blocks the worker until the gate opens
        let t0 = worker.submit(0);
        let t1 = worker.submit(1);
        let t2 = worker.submit(2);
        gate.wait();
        while worker.pump_blocking() {}

        assert_eq!(block_on(t0), Ok(0));
        assert_eq!(block_on(t1), Err(WorkerError::Cancelled));
        assert_eq!(block_on(t2), Ok(2));
    }
}

use cgmath::Point2;
use futures::executor::block_on;
use log::{debug, info, warn};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    panic::{catch_unwind, AssertUnwindSafe},
    path::Path,
    thread::sleep,
};
use stipple::{
    app::Session,
    render::PixelSurface,
    worker::{RenderWorker, WorkerError},
};

mod config;

use self::config::cmdline::Args;

fn main() {
    // Enable logging only in debug builds
    #[cfg(debug_assertions)]
    {
        env_logger::init();
    }

    let args = Args::from_env_or_exit();
    debug!("{:?}", args);

    let session = Session::new(args.session_config(), args.palette.clone());

    let frame = if args.threaded {
        run_threaded(session, &args)
    } else {
        run(session, &args)
    };

    let (surface, preview) = match frame {
        Some(frame) => frame,
        None => {
            eprintln!("error: No frame was rendered successfully");
            std::process::exit(1);
        }
    };

    for (path, surface) in [(&args.out, &surface), (&args.dithered_out, &preview)].iter() {
        if let Some(path) = path {
            if let Err(e) = save_ppm(surface, path) {
                eprintln!("error: Could not write '{}': {}", path.display(), e);
                std::process::exit(1);
            }
            info!("wrote {}", path.display());
        }
    }
}

type Frame = (PixelSurface, PixelSurface);

/// Sweep the pointer diagonally across the canvas, one step per frame.
fn pointer_at(session: &Session, frame: u32, frames: u32) -> Point2<i32> {
    let size = session.surface().size();
    let t = |extent: i32| (extent as i64 * frame as i64 / frames.max(1) as i64) as i32;
    Point2::new(t(size.x), t(size.y))
}

/// Run one tick. A tick that panics is logged and skipped.
fn render_frame(session: &mut Session, pointer: Point2<i32>) -> Option<Frame> {
    session.pointer_moved(pointer);
    match catch_unwind(AssertUnwindSafe(|| session.tick())) {
        Ok(()) => Some((
            session.surface().clone(),
            session.preview_surface().clone(),
        )),
        Err(_) => {
            warn!("frame {} failed; skipping it", session.frame());
            None
        }
    }
}

fn run(mut session: Session, args: &Args) -> Option<Frame> {
    let mut last = None;
    for i in 0..args.frames {
        let pointer = pointer_at(&session, i, args.frames);
        if let Some(frame) = render_frame(&mut session, pointer) {
            last = Some(frame);
        }
        sleep(args.interval);
    }
    last
}

fn run_threaded(mut session: Session, args: &Args) -> Option<Frame> {
    let pointers: Vec<_> = (0..args.frames)
        .map(|i| pointer_at(&session, i, args.frames))
        .collect();

    let mut worker = RenderWorker::new(move |pointer| render_frame(&mut session, pointer));

    let tickets: Vec<_> = pointers
        .into_iter()
        .map(|pointer| {
            let ticket = worker.submit(pointer);
            sleep(args.interval);
            worker.pump();
            ticket
        })
        .collect();
    while worker.pump_blocking() {}

    let mut last = None;
    let mut superseded = 0;
    for ticket in tickets {
        let id = ticket.id();
        match block_on(ticket) {
            Ok(Some(frame)) => last = Some(frame),
            Ok(None) => {}
            Err(WorkerError::Cancelled) => superseded += 1,
            Err(e) => warn!("request {}: {}", id, e),
        }
    }
    info!("{} of {} requests superseded", superseded, args.frames);
    last
}

fn save_ppm(surface: &PixelSurface, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    surface.write_ppm(&mut out)?;
    out.flush()
}

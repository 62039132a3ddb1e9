use std::thread;

use super::*;

fn solid(value: u8) -> FramePixels {
    FramePixels {
        width: 2,
        height: 2,
        order: ChannelOrder::Rgba,
        data: vec![value; 16],
    }
}

#[test]
fn empty_buffer_has_no_snapshot() {
    let buf = FrameBuffer::new();
    assert!(buf.snapshot().is_none());
    assert_eq!(buf.latest_seq(), None);
}

#[test]
fn publish_assigns_increasing_sequence_numbers() {
    let buf = FrameBuffer::new();
    assert_eq!(buf.publish(solid(1)), FrameSeq(1));
    assert_eq!(buf.publish(solid(2)), FrameSeq(2));
    let snap = buf.snapshot().unwrap();
    assert_eq!(snap.seq(), FrameSeq(2));
    assert_eq!(snap.pixels().data[0], 2);
}

#[test]
fn held_snapshot_survives_later_publish() {
    let buf = FrameBuffer::new();
    buf.publish(solid(7));
    let old = buf.snapshot().unwrap();
    buf.publish(solid(9));
    assert_eq!(old.pixels().data, vec![7; 16]);
    assert_eq!(buf.snapshot().unwrap().pixels().data, vec![9; 16]);
}

#[test]
fn png_is_encoded_once_and_shared() {
    let buf = FrameBuffer::new();
    buf.publish(solid(3));
    let frame = buf.snapshot().unwrap();
    let a = frame.encoded_png().unwrap();
    let b = frame.encoded_png().unwrap();
    assert_eq!(a.as_ptr(), b.as_ptr());
}

#[test]
fn concurrent_readers_never_see_torn_frames() {
    let buf = Arc::new(FrameBuffer::new());
    buf.publish(solid(0));
    let writer = {
        let buf = Arc::clone(&buf);
        thread::spawn(move || {
            for i in 1..=200u8 {
                buf.publish(solid(i));
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let buf = Arc::clone(&buf);
            thread::spawn(move || {
                let mut last = FrameSeq(0);
                for _ in 0..500 {
                    let f = buf.snapshot().unwrap();
                    let first = f.pixels().data[0];
                    assert!(f.pixels().data.iter().all(|&b| b == first));
                    assert!(f.seq() >= last);
                    last = f.seq();
                }
            })
        })
        .collect();
    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }
    assert_eq!(buf.latest_seq(), Some(FrameSeq(201)));
}

#[test]
fn subscribers_see_every_publish() {
    let buf = FrameBuffer::new();
    let mut rx = buf.subscribe();
    assert!(!rx.has_changed().unwrap());
    buf.publish(solid(1));
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), Some(FrameSeq(1)));
    assert!(!rx.has_changed().unwrap());
    buf.publish(solid(2));
    assert_eq!(*rx.borrow_and_update(), Some(FrameSeq(2)));
}

#[test]
fn publishing_without_subscribers_is_fine() {
    let buf = FrameBuffer::new();
    drop(buf.subscribe());
    assert_eq!(buf.publish(solid(4)), FrameSeq(1));
}

use std::thread;

use super::*;
use crate::pixel::buffer::Dims;

fn open(closed: bool) -> Display {
    let frame = Image::new(Dims::new(2, 2, 1, 3), 7, 64).unwrap();
    Display::new(frame, "view", Normalization::from_code(1).unwrap(), false, closed)
}

#[test]
fn fresh_display_reports_no_input() {
    let d = open(false);
    assert_eq!(d.title(), "view");
    assert_eq!(d.button(), 0);
    assert_eq!((d.mouse_x(), d.mouse_y()), (-1, -1));
    assert!(!d.is_closed());
    assert_eq!(d.frame().get(1, 1, 0, 2).unwrap(), 7);
}

#[test]
fn wait_applies_every_queued_event() {
    let mut d = open(false);
    let ctl = d.controller();
    ctl.send(DisplayEvent::Mouse { x: 3, y: 4 }).unwrap();
    ctl.send(DisplayEvent::Button(1)).unwrap();
    d.wait();
    assert_eq!((d.mouse_x(), d.mouse_y()), (3, 4));
    assert_eq!(d.button(), 1);
}

#[test]
fn wait_blocks_until_another_thread_sends() {
    let mut d = open(false);
    let ctl = d.controller();
    let sender = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        ctl.send(DisplayEvent::Close).unwrap();
    });
    d.wait();
    sender.join().unwrap();
    assert!(d.is_closed());
}

#[test]
fn wait_time_gives_up() {
    let mut d = open(false);
    d.wait_time(5);
    assert_eq!(d.button(), 0);
}

#[test]
fn closed_display_does_not_block_and_show_reopens() {
    let mut d = open(true);
    d.wait();
    assert!(d.is_closed());
    d.show(&Image::empty());
    assert!(!d.is_closed());
    assert!(d.frame().is_empty());
}

#[test]
fn normalization_codes() {
    assert_eq!(Normalization::from_code(3).unwrap().code(), 3);
    assert!(Normalization::from_code(4).is_err());
}

#[test]
fn controller_fails_after_release() {
    let d = open(false);
    let ctl = d.controller();
    drop(d);
    assert!(ctl.send(DisplayEvent::Button(2)).is_err());
}

//! Properties that hold for every frame whatever the view.

use level::{MapObject, Sector};
use math::Angle;
use render_trait::PixelBuffer;

use super::maps::*;
use super::{render, view};
use crate::{DrawSeg, SilClip};

fn angles() -> impl Iterator<Item = f32> {
    (0..18).map(|k| k as f32 * 20.0)
}

#[test]
fn clip_list_sorted_and_apart() {
    let pics = pic_data();
    let map = two_rooms(
        Sector::new(0, 128, FLOOR_FLAT, CEILING_FLAT, 160),
        Sector::new(24, 96, FLOOR_FLAT, CEILING_FLAT, 144),
    );
    for x in [32, 128, 300, 480] {
        for degrees in angles() {
            let frame = render(&view(x, 100, 41, degrees), &map, &[], &pics);
            let ranges = frame.renderer.solid_ranges();
            assert!(!ranges.is_empty());
            for pair in ranges.windows(2) {
                assert!(pair[0].first <= pair[0].last, "{x} {degrees}: {pair:?}");
                assert!(pair[0].last + 1 < pair[1].first, "{x} {degrees}: {pair:?}");
            }
        }
    }
}

#[test]
fn solid_walls_claim_each_column_once() {
    let pics = pic_data();
    let map = one_room(512, CEILING_FLAT, WALL_TEX);
    for (x, y) in [(256, 256), (64, 64), (400, 128)] {
        for degrees in angles() {
            let frame = render(&view(x, y, 41, degrees), &map, &[], &pics);
            let mut segs: Vec<DrawSeg> = frame.renderer.drawsegs().to_vec();
            assert!(segs.iter().all(|d| d.sprbottomclip == SilClip::Solid));
            segs.sort_by_key(|d| d.x1);

            let mut next = 0;
            for ds in &segs {
                assert_eq!(ds.x1, next, "at {x},{y} {degrees}");
                assert!(ds.x2 >= ds.x1);
                next = ds.x2 + 1;
            }
            assert_eq!(next, 320, "at {x},{y} {degrees}");
        }
    }
}

#[test]
fn one_room_from_the_middle() {
    let pics = pic_data();
    let map = one_room(512, CEILING_FLAT, WALL_TEX);
    for degrees in angles() {
        let frame = render(&view(256, 256, 41, degrees), &map, &[], &pics);
        assert!(frame.stats.drawsegs <= 3, "{degrees}: {}", frame.stats.drawsegs);
        assert_eq!(frame.stats.visplanes, 2, "{degrees}");
        // every visplane that was opened was also marked
        for plane in frame.renderer.visplanes() {
            assert!(plane.minx <= plane.maxx);
        }
    }
}

#[test]
fn sprites_sorted_far_to_near() {
    let pics = pic_data();
    let map = one_room(512, CEILING_FLAT, WALL_TEX);
    let things = [
        MapObject::new(192, 256, 0, Angle::ZERO, MONSTER, 0),
        MapObject::new(448, 300, 0, Angle::A90, MONSTER, 0),
        MapObject::new(320, 200, 0, Angle::A180, MONSTER, 0),
    ];
    let frame = render(&view(64, 256, 41, 0.0), &map, &things, &pics);

    let sprites = frame.renderer.vissprites();
    assert_eq!(sprites.len(), 3);
    for pair in sprites.windows(2) {
        assert!(pair[0].scale <= pair[1].scale);
        // looking east, further means a larger x
        assert!(pair[0].gx > pair[1].gx);
    }
}

#[test]
fn near_room_is_walked_first() {
    let pics = pic_data();
    let sector = Sector::new(0, 128, FLOOR_FLAT, CEILING_FLAT, 160);
    let map = two_rooms(sector.clone(), sector);

    let order = |x, degrees| {
        let frame = render(&view(x, 128, 41, degrees), &map, &[], &pics);
        frame
            .renderer
            .drawsegs()
            .iter()
            .map(|d| d.curline)
            .collect::<Vec<_>>()
    };

    let from_west = order(64, 0.0);
    let first_east = from_west.iter().position(|l| EAST_SEGS.contains(l)).unwrap();
    assert!(from_west[..first_east].iter().all(|l| WEST_SEGS.contains(l)));
    assert!(from_west[first_east..].iter().all(|l| EAST_SEGS.contains(l)));

    let from_east = order(448, 180.0);
    let first_west = from_east.iter().position(|l| WEST_SEGS.contains(l)).unwrap();
    assert!(from_east[..first_west].iter().all(|l| EAST_SEGS.contains(l)));
    assert!(from_east[first_west..].iter().all(|l| WEST_SEGS.contains(l)));
}

#[test]
fn same_view_same_frame() {
    let pics = pic_data();
    let map = two_rooms(
        Sector::new(0, 128, FLOOR_FLAT, CEILING_FLAT, 160),
        Sector::new(24, 128, FLOOR_FLAT, CEILING_FLAT, 160),
    );
    let things = [MapObject::new(384, 128, 24, Angle::ZERO, MONSTER, 0)];
    let a = render(&view(64, 128, 41, 10.0), &map, &things, &pics);
    let b = render(&view(64, 128, 41, 10.0), &map, &things, &pics);
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.buffer.buf(), b.buffer.buf());
}

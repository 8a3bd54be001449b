use super::*;

#[test]
fn boundaries_are_floor_thirds() {
    for w in 3u32..200 {
        let goal = GoalBox::new(17, 5, 17 + w, 60).unwrap();
        let r = GoalRegions::split(goal);
        assert_eq!(r.boundaries(), [17 + w / 3, 17 + 2 * (w / 3)]);
    }
}

#[test]
fn spans_tile_the_box_with_remainder_on_the_right() {
    let goal = GoalBox::new(100, 0, 200, 10).unwrap();
    let [l, c, r] = GoalRegions::split(goal).spans();
    assert_eq!((l.x_start, l.x_end), (100, 133));
    assert_eq!((c.x_start, c.x_end), (133, 166));
    assert_eq!((r.x_start, r.x_end), (166, 200));
}

#[test]
fn narrow_box_collapses_inner_regions() {
    let goal = GoalBox::new(10, 0, 12, 10).unwrap();
    let r = GoalRegions::split(goal);
    assert_eq!(r.region_width, 0);
    assert_eq!(r.boundaries(), [10, 10]);
}

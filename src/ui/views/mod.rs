mod roster_list;

pub use roster_list::draw_roster_list;

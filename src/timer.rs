/// An 8-bit countdown counter (DT or ST). Stops at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    /// Counts down by one. Returns whether the timer was running beforehand.
    pub fn tick(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        true
    }
}

#[test]
fn test_timer_floors_at_zero() {
    let mut timer = Timer::new(2);
    assert!(timer.tick());
    assert!(timer.tick());
    assert_eq!(timer.count, 0);
    assert!(!timer.tick());
    assert_eq!(timer.count, 0);
}

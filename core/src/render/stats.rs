//! Rendering statistics.

use core::fmt::{self, Display, Formatter};
use core::ops::AddAssign;

/// An input/output pair: how many items entered a stage and how many
/// survived it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Throughput {
    pub i: usize,
    pub o: usize,
}

/// Counters accumulated by the renderer: frames begun, triangles
/// submitted and drawn, fragments tested and written.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    pub frames: usize,
    pub tris: Throughput,
    pub frags: Throughput,
}

impl Display for Throughput {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} in / {} out", self.i, self.o)
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "frames: {}", self.frames)?;
        writeln!(f, "tris:   {}", self.tris)?;
        writeln!(f, "frags:  {}", self.frags)
    }
}

impl AddAssign for Throughput {
    fn add_assign(&mut self, rhs: Self) {
        self.i += rhs.i;
        self.o += rhs.o;
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Self) {
        self.frames += rhs.frames;
        self.tris += rhs.tris;
        self.frags += rhs.frags;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulation() {
        let mut s = Stats::default();
        s += Stats {
            frames: 1,
            tris: Throughput { i: 10, o: 7 },
            frags: Throughput { i: 100, o: 80 },
        };
        s += Stats {
            frames: 1,
            tris: Throughput { i: 5, o: 5 },
            frags: Throughput { i: 50, o: 50 },
        };
        assert_eq!(s.frames, 2);
        assert_eq!(s.tris, Throughput { i: 15, o: 12 });
        assert_eq!(s.frags, Throughput { i: 150, o: 130 });
    }
}

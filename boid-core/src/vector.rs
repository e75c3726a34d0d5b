/// A 2D vector used for position, velocity and steering forces
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

#[cfg(feature = "std")]
pub(crate) fn sqrt(value: f32) -> f32 {
    value.sqrt()
}

#[cfg(not(feature = "std"))]
pub(crate) fn sqrt(value: f32) -> f32 {
    libm::sqrtf(value)
}

#[cfg(feature = "std")]
pub(crate) fn sin_cos(angle: f32) -> (f32, f32) {
    angle.sin_cos()
}

#[cfg(not(feature = "std"))]
pub(crate) fn sin_cos(angle: f32) -> (f32, f32) {
    (libm::sinf(angle), libm::cosf(angle))
}

#[cfg(feature = "std")]
fn atan2(y: f32, x: f32) -> f32 {
    y.atan2(x)
}

#[cfg(not(feature = "std"))]
fn atan2(y: f32, x: f32) -> f32 {
    libm::atan2f(y, x)
}

impl Vector2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn magnitude(&self) -> f32 {
        sqrt(self.magnitude_squared())
    }

    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction. The zero vector normalizes to itself.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    /// Same direction, magnitude `length`. A zero vector has no direction and stays zero.
    pub fn scale_to_length(&self, length: f32) -> Self {
        self.normalize() * length
    }

    pub fn limit(&self, max: f32) -> Self {
        if self.magnitude_squared() > max * max {
            self.scale_to_length(max)
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        sqrt(self.distance_squared(other))
    }

    pub fn distance_squared(&self, other: &Vector2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Counter-clockwise rotation by `angle` radians (in y-down screen space this turns clockwise).
    pub fn rotate(&self, angle: f32) -> Self {
        let (sin, cos) = sin_cos(angle);
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Direction of the vector in radians, measured from the +x axis.
    pub fn heading(&self) -> f32 {
        atan2(self.y, self.x)
    }

    /// Signed angle in radians that rotates `self` onto `other`, in (-PI, PI].
    pub fn angle_to(&self, other: &Vector2D) -> f32 {
        let cross = self.x * other.y - self.y * other.x;
        let dot = self.x * other.x + self.y * other.y;
        atan2(cross, dot)
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

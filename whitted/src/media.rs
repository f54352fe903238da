use crate::material::Material;

/// The nested dielectric volumes a ray path currently sits inside. Air is the
/// floor of the stack and is never removed.
#[derive(Debug, Clone)]
pub struct MediaStack<'m> {
    stack: Vec<&'m Material>,
}

impl Default for MediaStack<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'m> MediaStack<'m> {
    pub fn new() -> Self {
        Self {
            stack: vec![&Material::AIR],
        }
    }

    /// The medium the ray is travelling through.
    pub fn top(&self) -> &'m Material {
        self.stack[self.stack.len() - 1]
    }

    /// The medium surrounding the top one. Air when nothing has been entered.
    pub fn outside(&self) -> &'m Material {
        match self.stack.len() {
            1 => self.stack[0],
            n => self.stack[n - 2],
        }
    }

    pub fn push(&mut self, material: &'m Material) {
        self.stack.push(material);
    }

    /// Leave the innermost medium. The air floor stays put.
    pub fn pop(&mut self) -> Option<&'m Material> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Number of media entered above the air floor.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Whether `material` is the medium the ray is inside, by identity.
    pub fn is_inside(&self, material: &Material) -> bool {
        std::ptr::eq(self.top(), material)
    }
}

//! Fixed catalog of concepts and the canned fallback explanation

/// Concepts the gateway picks from
pub const CONCEPTS: [&str; 30] = [
    "Algorithm",
    "Data Structure",
    "Variable",
    "Function",
    "Loop",
    "Conditional Statement (If/Else)",
    "API (Application Programming Interface)",
    "Database",
    "Version Control (Git)",
    "Operating System",
    "Computer Network",
    "IP Address",
    "DNS (Domain Name System)",
    "HTML",
    "CSS",
    "JavaScript",
    "Python Programming Language",
    "Debugging",
    "Encryption",
    "Cloud Computing",
    "Machine Learning",
    "Artificial Intelligence",
    "Binary Code",
    "Compiler",
    "Recursion",
    "Object-Oriented Programming (OOP)",
    "Boolean Logic",
    "CPU (Central Processing Unit)",
    "RAM (Random Access Memory)",
    "Software Development Life Cycle (SDLC)",
];

/// Concept served when the provider is unavailable
pub const FALLBACK_CONCEPT: &str = "Algorithms";

/// Canned explanation for [`FALLBACK_CONCEPT`]
pub const FALLBACK_EXPLANATION: &str = r#"# What is an Algorithm?

Imagine you want to build the tallest tower of blocks in your room. If you just
throw blocks on the floor, you get a pile, not a tower. You need a **plan**.

An **algorithm** is that plan: a list of steps, in order, that gets a job done.

## The Sandwich Algorithm

1. **Take two slices of bread.**
2. **Spread peanut butter on one slice.**
3. **Spread jelly on the other slice.**
4. **Press the two slices together.**
5. **Eat!**

If you skip a step or do them in the wrong order, you don't get a sandwich.
Computers are the same: they are super fast helpers, but they only do
*exactly* what the steps say.

## Algorithms Are Everywhere

* **Brushing your teeth:** get the brush, add toothpaste, brush up and down, rinse.
* **Finding your red toy car:** look at a toy, is it red? Is it a car? If yes,
  you found it! If not, look at the next toy.

## An Algorithm Written for a Computer

Here is a tiny algorithm that lines up toys from smallest to biggest:

```python
def sort_toys_by_size(toys):
    # put the toys in order, smallest first
    return sorted(toys, key=lambda toy: toy["size"])

toys = [
    {"name": "big truck", "size": 3},
    {"name": "small teddy bear", "size": 1},
    {"name": "medium car", "size": 2},
]

for toy in sort_toys_by_size(toys):
    print(toy["name"])
```

**So an algorithm is just a recipe of steps, and computers follow recipes
really, really fast!**
"#;

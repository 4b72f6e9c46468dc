//! 固定提示词

pub const SINGLE_FRAME_PROMPT: &str = "\
Describe what the user is doing in this frame from a screen recording.
Your output will be used by another AI, so precision is critical.

Provide the following in Markdown format:
1.  **Action:** What the user appears to be doing (e.g., \"Hovering over the 'Search' button\", \"Typing into the search bar\").
2.  **URL:** The full, exact URL visible in the address bar, if any.
3.  **Visible Text:** A verbatim copy of all text visible on the screen.

Do not summarize or make assumptions.";

pub const CHUNK_PROMPT: &str = "\
Analyze the user's actions across these consecutive frames from a screen recording with extreme detail.
Your output will be used by another AI, so precision is critical.

For each step, provide the following in Markdown format:
1.  **Action:** A detailed, step-by-step description of the user's action (e.g., \"Clicked the 'Search' button,\" \"Typed 'hello world' into the search bar\").
2.  **URL:** The full, exact URL visible in the address bar.
3.  **Visible Text:** A verbatim copy of all text visible on the screen.

Describe the changes between the frames to create a narrative of the user's journey. Do not summarize or make assumptions.";

pub const SYNTHESIS_PROMPT: &str = "\
The following is a series of descriptions from individual frames of a screen recording.
Please synthesize these descriptions into a single, coherent, step-by-step user journey.
Focus on creating a clear narrative that explains what the user was trying to accomplish.
Format the output as a clean, easy-to-read Markdown document.";

pub const SUMMARY_PROMPT: &str = "\
The following is a highly detailed, step-by-step log of a user's actions from a screen recording, including full URLs and all visible text.
Please synthesize this log into a simple, concise, and easy-to-read numbered list of the user's key actions.
For each step, include the action taken and the full URL where the action occurred.
Focus on the most significant steps the user took to achieve their goal.
The output should be a clean Markdown document, suitable for a human to quickly understand the user's journey.";

/// 把正文夹在 `---` 之间拼到指令后面
pub fn embed_text(instruction: &str, text: &str) -> String {
    format!("{instruction}\n\n---\n{text}\n---\n")
}
